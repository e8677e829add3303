//! Codec for chunk type 7 = FLI_SS2.

use std::io::Cursor;
use byteorder::LittleEndian as LE;
use byteorder::ReadBytesExt;

use ::{FlicError,FlicResult,RasterMut,Rect};

/// Magic for a FLI_SS2 chunk - Word Aligned Delta Compression.
///
/// The usual encoding for every Animator Pro frame after the first.
/// Only the words that differ from the previous frame are stored, so
/// the surface must still hold the previous frame.
///
/// The chunk opens with a word giving the number of encoded lines;
/// lines that are skipped over are not counted.  Each encoded line
/// starts with one or more control words, classified by their top
/// two bits:
///
///   Bits 15-14 | Meaning
///  :----------:| -------------------------------------------------
///        00    | Packet count for this line.  Always the last control word of a line; may be zero.
///        01    | Reserved, ignored.
///        10    | The low byte is the rightmost pixel of the line, for odd widths.
///        11    | Negated count of lines to skip before this line.
///
/// Each packet is a column skip byte and a signed count byte.  A
/// positive count n is followed by n words to copy; a negative count
/// -n by a single word to store n times.  Both bytes of a word are
/// stored as they appear in the stream.
pub const FLI_SS2: u16 = 7;

const OP_PACKETCOUNT: u16 = 0;
const OP_LASTPIXEL: u16 = 2;
const OP_LINESKIPCOUNT: u16 = 3;

/// A validated write, applied once the whole chunk has parsed.
#[derive(Clone,Copy)]
enum Packet {
    /// Words copied from the chunk, starting at this offset.
    Literal(usize),
    /// One word, repeated.
    Repeat(u8, u8),
    /// The rightmost pixel of a line.
    LastPixel(u8),
}

/// Decode a FLI_SS2 chunk.
///
/// Every packet, and every last byte, appends a dirty rectangle.  The
/// whole chunk is parsed before anything is written, so a rejected
/// chunk leaves the surface and dirty rectangles as they were.
pub fn decode_fli_ss2(src: &[u8], dst: &mut RasterMut)
        -> FlicResult<()> {
    let packets = parse_fli_ss2(src, dst.w, dst.h)?;

    for &(rect, packet) in packets.iter() {
        {
            let row = dst.w * rect.top;
            let line = &mut dst.buf[(row + rect.left)..(row + rect.right)];
            match packet {
                Packet::Literal(pos) => line.copy_from_slice(&src[pos..(pos + rect.width())]),
                Packet::Repeat(c0, c1) => {
                    for e in line.chunks_mut(2) {
                        e[0] = c0;
                        e[1] = c1;
                    }
                },
                Packet::LastPixel(c) => line[0] = c,
            }
        }

        dst.mark_dirty(rect);
    }

    Ok(())
}

fn parse_fli_ss2(src: &[u8], w: usize, h: usize)
        -> FlicResult<Vec<(Rect, Packet)>> {
    let mut r = Cursor::new(src);
    let mut packets = Vec::new();
    let mut y = 0;

    let nlines = r.read_u16::<LE>()?;
    for _ in 0..nlines {
        let count = loop {
            let opcode = r.read_u16::<LE>()?;

            match opcode >> 14 {
                OP_PACKETCOUNT => break opcode,
                OP_LASTPIXEL => {
                    if y >= h || w == 0 {
                        return Err(FlicError::Corrupted);
                    }

                    packets.push((Rect::new(w - 1, y, w, y + 1), Packet::LastPixel(opcode as u8)));
                },
                OP_LINESKIPCOUNT => {
                    // Skip lines.
                    y = y + (-((opcode as i16) as i32)) as usize;
                },
                _ => (),
            }
        };

        let mut x0 = 0;

        for _ in 0..count {
            let nskip = r.read_u8()? as usize;
            let signed_length = r.read_i8()? as i32;

            let start = x0 + nskip;
            let end = start + 2 * signed_length.abs() as usize;

            if signed_length > 0 {
                if y >= h || end > w {
                    return Err(FlicError::Corrupted);
                }

                let pos = r.position() as usize;
                if pos + (end - start) > src.len() {
                    return Err(FlicError::Corrupted);
                }

                r.set_position((pos + (end - start)) as u64);
                packets.push((Rect::new(start, y, end, y + 1), Packet::Literal(pos)));
            } else if signed_length < 0 {
                let c0 = r.read_u8()?;
                let c1 = r.read_u8()?;
                if y >= h || end > w {
                    return Err(FlicError::Corrupted);
                }

                packets.push((Rect::new(start, y, end, y + 1), Packet::Repeat(c0, c1)));
            }

            x0 = end;
        }

        y = y + 1;
    }

    Ok(packets)
}
