//! FLIC implementation.

use std::io;
use std::io::{Read,Seek,SeekFrom};
use byteorder::LittleEndian as LE;
use byteorder::ReadBytesExt;

use ::{FlicError,FlicResult,Palette,RasterMut,Rect,Surface};
use codec::*;

/// Magic for a FLC file - Animator Pro FLC Files.
///
/// An FLC file is a 128 byte header followed by frame chunks, one per
/// frame, and then a ring frame.  The ring frame is a delta from the
/// last frame back to the first, so a looping player never has to
/// restart from a full image.
///
/// Header fields used for playback, all little-endian and unsigned:
///
///   Offset | Length |   Name   | Description
///   ------:| ------:|:--------:| -----------------------------------
///        0 |      4 |   size   | File size in bytes.
///        4 |      2 |   magic  | 0xAF12.
///        6 |      2 |  frames  | Frame count, excluding the ring frame.
///        8 |      2 |   width  | Initial surface width.
///       10 |      2 |   height | Initial surface height.
///       12 |      2 |   depth  | Bits per pixel, must be 8.
///       14 |      2 |   flags  | Ignored.
///       16 |      4 |   speed  | Default delay between frames, in milliseconds.
///       80 |      4 |  oframe1 | Position of the first frame chunk; 0 means directly after the header.
///       84 |      4 |  oframe2 | Position of the second frame chunk, where playback resumes after the ring frame.
///
/// Everything else in the header is ignored.
pub const FLIHR_MAGIC: u16 = 0xAF12;

/// Size of a FLIC file header on disk.
pub const SIZE_OF_FLIC_HEADER: usize = 128;

/// Offset of the oframe1 and oframe2 fields in the FLIC file header.
const OFFSET_OF_OFRAME1: u64 = 80;

/// Magic for a FLIC frame - FLIC Frame Chunks.
///
/// One frame of the animation.  The 16 byte frame header is followed
/// by the sub-chunks that paint the frame:
///
///   Offset | Length |   Name   | Description
///   ------:| ------:|:--------:| -----------------------------------
///        0 |      4 |   size   | Size of the frame including its sub-chunks.
///        4 |      2 |   type   | 0xF1FA.
///        6 |      2 |  chunks  | Number of sub-chunks.
///        8 |      2 |   delay  | New frame delay in milliseconds, 0 for unchanged.
///       10 |      2 | reserved | Ignored.
///       12 |      2 |   width  | New surface width, 0 for unchanged.
///       14 |      2 |  height  | New surface height, 0 for unchanged.
pub const FCID_FRAME: u16 = 0xF1FA;

/// Size of a FLIC frame header on disk.
pub const SIZE_OF_FLIC_FRAME: usize = 16;

/// Size of a chunk header on disk.
///
/// Each sub-chunk is a 4 byte size, counting this header, then a 2
/// byte type, then size - 6 bytes of data.  A frame with no
/// sub-chunks repeats the previous image but still takes its delay.
pub const SIZE_OF_CHUNK: usize = 6;

/// Decoder settings.
#[derive(Clone,Copy,Debug,Default,Eq,PartialEq)]
pub struct FlicOptions {
    /// Treat declared chunk sizes as authoritative.
    ///
    /// When unset, a frame whose sub-chunks do not add up to its
    /// declared size only produces a warning.  When set, it is an
    /// error, and so is a sub-chunk extending past its frame.
    pub strict_chunk_sizes: bool,
}

/// FLC playback decoder over a seekable stream.
///
/// Owns the stream, the frame surface, the palette and the dirty
/// rectangles of the frames decoded since they were last cleared.
pub struct FlicDecoder<R> {
    file: R,
    options: FlicOptions,

    frame_count: u16,
    speed_msec: u32,
    offset_frame1: u64,
    offset_frame2: u64,

    surface: Surface,
    palette: Palette,
    dirty_palette: bool,
    dirty_rects: Vec<Rect>,

    cur_frame: i32,
    frame_delay: u32,
    next_frame_start_time: u32,
    at_ring_frame: bool,
}

/// FLIC file header, as much of it as playback needs.
struct FlicHeader {
    frame_count: u16,
    w: u16,
    h: u16,
}

/// Track timing and loop points.
struct TrackHeader {
    speed_msec: u32,
    offset_frame1: u64,
    offset_frame2: u64,
}

/*--------------------------------------------------------------*/

impl FlicOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether declared chunk sizes are enforced.
    pub fn strict_chunk_sizes(mut self, strict: bool) -> Self {
        self.strict_chunk_sizes = strict;
        self
    }
}

impl<R: Read + Seek> FlicDecoder<R> {
    /// Open a FLC stream with the default options.
    ///
    /// The stream must be positioned at the start of the file header.
    /// Frame offsets in the header are taken as absolute stream
    /// positions.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    ///
    /// let file = File::open("ex.flc").unwrap();
    /// let flic = flicdec::FlicDecoder::new(file).unwrap();
    /// println!("{}x{}, {} frames", flic.width(), flic.height(), flic.frame_count());
    /// ```
    pub fn new(file: R)
            -> FlicResult<Self> {
        Self::with_options(file, FlicOptions::default())
    }

    /// Open a FLC stream.
    pub fn with_options(mut file: R, options: FlicOptions)
            -> FlicResult<Self> {
        let hdr = read_flic_header(&mut file)?;
        let track = read_track_header(&mut file)?;

        debug!("FLC {}x{}, {} frames, {} ms/frame",
                hdr.w, hdr.h, hdr.frame_count, track.speed_msec);

        Ok(FlicDecoder {
            file: file,
            options: options,

            frame_count: hdr.frame_count,
            speed_msec: track.speed_msec,
            offset_frame1: track.offset_frame1,
            offset_frame2: track.offset_frame2,

            surface: Surface::new(hdr.w as usize, hdr.h as usize),
            palette: Palette::new(),
            dirty_palette: false,
            dirty_rects: Vec::new(),

            cur_frame: -1,
            frame_delay: track.speed_msec,
            next_frame_start_time: 0,
            at_ring_frame: false,
        })
    }

    /// Decode the next frame chunk into the surface.
    ///
    /// The surface must still hold the previous frame, since most
    /// frames are deltas.  The returned reference is valid until the
    /// next call.
    ///
    /// Any error leaves the decoder in an unknown position within the
    /// stream; it should be discarded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    ///
    /// let file = File::open("ex.flc").unwrap();
    /// let mut flic = flicdec::FlicDecoder::new(file).unwrap();
    /// let mut screen = vec![0; flic.width() * flic.height()];
    /// let pitch = flic.width();
    ///
    /// while !flic.end_of_track() {
    ///     flic.decode_next_frame().unwrap();
    ///     flic.copy_dirty_rects_to_buffer(&mut screen, pitch).unwrap();
    /// }
    /// ```
    pub fn decode_next_frame(&mut self)
            -> FlicResult<&Surface> {
        let size = self.file.read_u32::<LE>()?;
        let magic = self.file.read_u16::<LE>()?;

        match magic {
            FCID_FRAME => self.handle_frame(size)?,
            FLIHR_MAGIC => {
                // Looping back through offset 0 lands on the file header.
                let skip = (SIZE_OF_FLIC_HEADER - SIZE_OF_CHUNK) as i64;
                self.file.seek(SeekFrom::Current(skip))?;
            },
            _ => return Err(FlicError::UnsupportedChunk(magic)),
        }

        self.cur_frame = self.cur_frame + 1;
        self.next_frame_start_time = self.next_frame_start_time.wrapping_add(self.frame_delay);

        if self.at_ring_frame {
            // Having applied the ring frame, continue from the second frame.
            self.at_ring_frame = false;
            self.file.seek(SeekFrom::Start(self.offset_frame2))?;
        }

        Ok(&self.surface)
    }

    /// Restart the track.
    ///
    /// At the end of the track, if the ring frame is present, the next
    /// decode plays the ring frame and continues from the second
    /// frame.  Otherwise the next decode starts from the first frame.
    pub fn rewind(&mut self)
            -> FlicResult<()> {
        if self.end_of_track()
                && self.frame_count != 1
                && self.stream_position()? < self.stream_len()? {
            self.at_ring_frame = true;
        } else {
            self.at_ring_frame = false;
            self.file.seek(SeekFrom::Start(self.offset_frame1))?;
        }

        self.cur_frame = -1;
        self.next_frame_start_time = 0;
        self.frame_delay = self.speed_msec;
        Ok(())
    }

    /// Copy the dirty rectangles of the surface into a screen buffer,
    /// then clear them.
    ///
    /// Rectangle rows are written at `y * pitch + x`.  If any
    /// rectangle does not fit, nothing is copied.
    pub fn copy_dirty_rects_to_buffer(&mut self, dst: &mut [u8], pitch: usize)
            -> FlicResult<()> {
        if pitch < self.surface.width() {
            return Err(FlicError::WrongResolution);
        }

        for rect in self.dirty_rects.iter() {
            if rect.height() == 0 {
                continue;
            }

            let last = (rect.bottom - 1).checked_mul(pitch)
                    .and_then(|n| n.checked_add(rect.right));
            match last {
                Some(n) if n <= dst.len() => (),
                _ => return Err(FlicError::WrongResolution),
            }
        }

        for rect in self.dirty_rects.iter() {
            for y in rect.top..rect.bottom {
                let start = y * pitch + rect.left;
                let end = start + rect.width();
                dst[start..end].copy_from_slice(&self.surface.row(y)[rect.left..rect.right]);
            }
        }

        self.clear_dirty_rects();
        Ok(())
    }

    /// Release the stream.
    pub fn into_inner(self) -> R {
        self.file
    }

    /// Handle a frame chunk, the header of which has been read up to
    /// and including the type.
    fn handle_frame(&mut self, frame_size: u32)
            -> FlicResult<()> {
        let num_chunks = self.file.read_u16::<LE>()?;
        let delay = self.file.read_u16::<LE>()?;
        let _reserved = self.file.read_u16::<LE>()?;
        let new_w = self.file.read_u16::<LE>()? as usize;
        let new_h = self.file.read_u16::<LE>()? as usize;

        if delay > 0 {
            self.frame_delay = delay as u32;
        }

        if new_w != 0 || new_h != 0 {
            let w = if new_w != 0 { new_w } else { self.surface.width() };
            let h = if new_h != 0 { new_h } else { self.surface.height() };
            if w != self.surface.width() || h != self.surface.height() {
                debug!("frame {} - resizing from {}x{} to {}x{}",
                        self.cur_frame + 1, self.surface.width(), self.surface.height(), w, h);
                self.surface = Surface::new(w, h);
                self.dirty_rects.clear();
                self.dirty_rects.push(self.surface.bounds());
            }
        }

        trace!("frame {} - {} chunks", self.cur_frame + 1, num_chunks);

        let mut offset = SIZE_OF_FLIC_FRAME as u64;
        for _ in 0..num_chunks {
            let size = self.file.read_u32::<LE>()?;
            let magic = self.file.read_u16::<LE>()?;

            if (size as usize) < SIZE_OF_CHUNK {
                return Err(FlicError::Corrupted);
            }

            let size = self.fix_chunk_size(magic, size);
            if self.options.strict_chunk_sizes
                    && offset + size as u64 > frame_size as u64 {
                return Err(FlicError::Corrupted);
            }

            // The declared size is not trusted for the allocation.
            let len = size as u64 - SIZE_OF_CHUNK as u64;
            let mut buf = Vec::new();
            (&mut self.file).take(len).read_to_end(&mut buf)?;
            if (buf.len() as u64) < len {
                return Err(FlicError::Io(io::Error::new(io::ErrorKind::UnexpectedEof,
                        "sub-chunk extends past the end of the stream")));
            }

            trace!("frame {} - chunk type {}, {} bytes", self.cur_frame + 1, magic, buf.len());
            self.decode_chunk(magic, &buf)?;

            offset = offset + size as u64;
        }

        if offset != frame_size as u64 {
            if self.options.strict_chunk_sizes {
                return Err(FlicError::Corrupted);
            }

            warn!("frame {} reads {} bytes, expected {}",
                    self.cur_frame + 1, offset, frame_size);
        }

        Ok(())
    }

    /// Decode one sub-chunk into the surface and palette.
    fn decode_chunk(&mut self, magic: u16, buf: &[u8])
            -> FlicResult<()> {
        {
            let mut dst = RasterMut::new(
                    self.surface.width(), self.surface.height(),
                    self.surface.buf_mut(), self.palette.as_bytes_mut(),
                    &mut self.dirty_rects);
            decode_chunk(magic, buf, &mut dst)?;
        }

        if chunk_modifies_palette(magic) {
            self.dirty_palette = true;
        }

        Ok(())
    }

    /// A bug in Animator and Animator Pro caused FLI_COPY chunks to
    /// have size = size of data + 4 (size of pointer) instead of size
    /// of data + 6 (size of chunk header).  The data was still written
    /// to disk; only the chunk's size is incorrect.
    fn fix_chunk_size(&self, magic: u16, size: u32)
            -> u32 {
        let npixels = (self.surface.width() * self.surface.height()) as u64;
        if magic == FLI_COPY && size as u64 == npixels + 4 {
            warn!("frame {} - FLI_COPY has wrong size", self.cur_frame + 1);
            size + 2
        } else {
            size
        }
    }

    fn stream_position(&mut self)
            -> FlicResult<u64> {
        Ok(self.file.seek(SeekFrom::Current(0))?)
    }

    fn stream_len(&mut self)
            -> FlicResult<u64> {
        let pos = self.file.seek(SeekFrom::Current(0))?;
        let len = self.file.seek(SeekFrom::End(0))?;
        if pos != len {
            self.file.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }
}

impl<R> FlicDecoder<R> {
    /// Get the frame count, not including the ring frame.
    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    /// Get the index of the last decoded frame, or -1 if no frame has
    /// been decoded since opening or rewinding.
    pub fn current_frame(&self) -> i32 {
        self.cur_frame
    }

    /// True once the last frame, not counting the ring frame, has been
    /// decoded.
    pub fn end_of_track(&self) -> bool {
        self.cur_frame >= self.frame_count as i32 - 1
    }

    /// Current surface width.  May change between frames.
    pub fn width(&self) -> usize {
        self.surface.width()
    }

    /// Current surface height.  May change between frames.
    pub fn height(&self) -> usize {
        self.surface.height()
    }

    /// Number of milliseconds to delay between each frame, as given
    /// by the file header.
    pub fn speed_msec(&self) -> u32 {
        self.speed_msec
    }

    /// Number of milliseconds to delay after the current frame.  Frame
    /// chunks may override the file header's speed.
    pub fn frame_delay(&self) -> u32 {
        self.frame_delay
    }

    /// Time, in milliseconds since the start of the track, at which the
    /// next frame is due.
    pub fn next_frame_start_time(&self) -> u32 {
        self.next_frame_start_time
    }

    pub fn options(&self) -> FlicOptions {
        self.options
    }

    /// The decoded frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// True if a palette chunk was decoded since the flag was last
    /// cleared.
    pub fn is_palette_dirty(&self) -> bool {
        self.dirty_palette
    }

    pub fn clear_palette_dirty(&mut self) {
        self.dirty_palette = false;
    }

    /// Regions of the surface modified since the rectangles were last
    /// cleared, in the order they were modified.  Rectangles may
    /// overlap.
    ///
    /// A frame that resizes the surface discards the rectangles of the
    /// old surface and starts from a single rectangle covering the new
    /// one, since every pixel of the new surface must be repainted.
    pub fn dirty_rects(&self) -> &[Rect] {
        &self.dirty_rects[..]
    }

    pub fn clear_dirty_rects(&mut self) {
        self.dirty_rects.clear();
    }
}

/*--------------------------------------------------------------*/

/// Read the Animator Pro FLC header, up to and including the depth.
fn read_flic_header<R: Read>(r: &mut R)
        -> FlicResult<FlicHeader> {
    let _size = r.read_u32::<LE>()?;
    let magic = r.read_u16::<LE>()?;

    if magic != FLIHR_MAGIC {
        warn!("attempted to load non-FLC data (magic = 0x{:04X})", magic);
        return Err(FlicError::BadMagic(magic));
    }

    let frame_count = r.read_u16::<LE>()?;
    let width = r.read_u16::<LE>()?;
    let height = r.read_u16::<LE>()?;
    let depth = r.read_u16::<LE>()?;

    if depth != 8 {
        warn!("attempted to load a FLC with colour depth {}, only 8 is supported", depth);
        return Err(FlicError::UnsupportedDepth(depth));
    }

    Ok(FlicHeader {
        frame_count: frame_count,
        w: width,
        h: height,
    })
}

/// Read the rest of the header, and seek to the first frame.
fn read_track_header<R: Read + Seek>(r: &mut R)
        -> FlicResult<TrackHeader> {
    let _flags = r.read_u16::<LE>()?;
    let speed = r.read_u32::<LE>()?;

    r.seek(SeekFrom::Start(OFFSET_OF_OFRAME1))?;
    let mut offset_frame1 = r.read_u32::<LE>()? as u64;
    let offset_frame2 = r.read_u32::<LE>()? as u64;

    if offset_frame1 == 0 {
        offset_frame1 = SIZE_OF_FLIC_HEADER as u64;
    }

    r.seek(SeekFrom::Start(offset_frame1))?;

    Ok(TrackHeader {
        speed_msec: speed,
        offset_frame1: offset_frame1,
        offset_frame2: offset_frame2,
    })
}
