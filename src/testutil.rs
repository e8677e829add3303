//! Synthetic FLC streams for tests.

use byteorder::LittleEndian as LE;
use byteorder::WriteBytesExt;

use ::flic::{FCID_FRAME,FLIHR_MAGIC,SIZE_OF_CHUNK,SIZE_OF_FLIC_FRAME,SIZE_OF_FLIC_HEADER};

/// Write a sub-chunk with its 6 byte header.
pub fn sub_chunk(magic: u16, data: &[u8]) -> Vec<u8> {
    let mut w = Vec::new();
    w.write_u32::<LE>((SIZE_OF_CHUNK + data.len()) as u32).unwrap();
    w.write_u16::<LE>(magic).unwrap();
    w.extend_from_slice(data);
    w
}

/// Write a frame chunk with the correct declared size.
pub fn frame_chunk(delay: u16, new_w: u16, new_h: u16, chunks: &[Vec<u8>]) -> Vec<u8> {
    let size = SIZE_OF_FLIC_FRAME + chunks.iter().map(|c| c.len()).sum::<usize>();
    frame_chunk_with_size(size as u32, delay, new_w, new_h, chunks)
}

/// Write a frame chunk, declaring an arbitrary size.
pub fn frame_chunk_with_size(size: u32, delay: u16, new_w: u16, new_h: u16, chunks: &[Vec<u8>])
        -> Vec<u8> {
    let mut w = Vec::new();
    w.write_u32::<LE>(size).unwrap();
    w.write_u16::<LE>(FCID_FRAME).unwrap();
    w.write_u16::<LE>(chunks.len() as u16).unwrap();
    w.write_u16::<LE>(delay).unwrap();
    w.write_u16::<LE>(0).unwrap(); // reserved
    w.write_u16::<LE>(new_w).unwrap();
    w.write_u16::<LE>(new_h).unwrap();
    for c in chunks {
        w.extend_from_slice(c);
    }
    w
}

/// Write a 128 byte FLC header.
pub fn flc_header(magic: u16, frame_count: u16, width: u16, height: u16, depth: u16,
        speed_msec: u32, offset_frame1: u32, offset_frame2: u32)
        -> Vec<u8> {
    let mut w = Vec::new();
    w.write_u32::<LE>(0).unwrap(); // size, patched by flc_file
    w.write_u16::<LE>(magic).unwrap();
    w.write_u16::<LE>(frame_count).unwrap();
    w.write_u16::<LE>(width).unwrap();
    w.write_u16::<LE>(height).unwrap();
    w.write_u16::<LE>(depth).unwrap();
    w.write_u16::<LE>(3).unwrap(); // flags
    w.write_u32::<LE>(speed_msec).unwrap();
    w.resize(80, 0);
    w.write_u32::<LE>(offset_frame1).unwrap();
    w.write_u32::<LE>(offset_frame2).unwrap();
    w.resize(SIZE_OF_FLIC_HEADER, 0);
    w
}

/// Write a complete FLC file.  The frames should include the ring
/// frame; frame_count should not.
pub fn flc_file(width: u16, height: u16, speed_msec: u32, frame_count: u16, frames: &[Vec<u8>])
        -> Vec<u8> {
    let offset_frame1 = SIZE_OF_FLIC_HEADER as u32;
    let offset_frame2 = offset_frame1 + frames.first().map_or(0, |f| f.len() as u32);
    flc_file_with_offsets(width, height, speed_msec, frame_count, offset_frame1, offset_frame2, frames)
}

/// Write a complete FLC file with explicit frame offsets.
pub fn flc_file_with_offsets(width: u16, height: u16, speed_msec: u32, frame_count: u16,
        offset_frame1: u32, offset_frame2: u32, frames: &[Vec<u8>])
        -> Vec<u8> {
    let mut w = flc_header(FLIHR_MAGIC, frame_count, width, height, 8,
            speed_msec, offset_frame1, offset_frame2);
    for f in frames {
        w.extend_from_slice(f);
    }

    let size = w.len() as u32;
    (&mut w[0..4]).write_u32::<LE>(size).unwrap();
    w
}
