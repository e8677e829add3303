//! Codec for chunk type 15 = FLI_BRUN.

use std::io::{Cursor,Read};
use byteorder::ReadBytesExt;

use ::{FlicError,FlicResult,RasterMut};

/// Magic for a FLI_BRUN chunk - Byte Run Length Compression.
///
/// A complete image, run length encoded line by line from the top.
/// Typically found in the first frame of an animation.  There is one
/// encoded line per row of the surface.
///
/// Every line opens with a packet count byte inherited from the old
/// Animator format.  It overflows on wide lines, so it is skipped and
/// packets are decoded until the line holds exactly width pixels.
///
/// A packet starts with a signed count byte.  A positive count n is
/// followed by one pixel to repeat n times.  A negative count -n is
/// followed by n literal pixels.
pub const FLI_BRUN: u16 = 15;

/// Decode a FLI_BRUN chunk.
///
/// The image is decoded into a scratch buffer first, so a rejected
/// chunk leaves the surface as it was.
pub fn decode_fli_brun(src: &[u8], dst: &mut RasterMut)
        -> FlicResult<()> {
    let mut r = Cursor::new(src);
    let npixels = dst.w * dst.h;
    let mut scratch = vec![0; npixels];

    if dst.w > 0 {
        for row in scratch.chunks_mut(dst.w) {
            // Legacy packet count, superseded by the width.
            let _count = r.read_u8()?;
            let mut x0 = 0;

            while x0 < row.len() {
                let signed_length = r.read_i8()? as i32;

                if signed_length > 0 {
                    let start = x0;
                    let end = start + signed_length as usize;
                    if end > row.len() {
                        return Err(FlicError::Corrupted);
                    }

                    let c = r.read_u8()?;
                    for e in &mut row[start..end] {
                        *e = c;
                    }

                    x0 = end;
                } else if signed_length < 0 {
                    let start = x0;
                    let end = start + (-signed_length) as usize;
                    if end > row.len() {
                        return Err(FlicError::Corrupted);
                    }

                    r.read_exact(&mut row[start..end])?;

                    x0 = end;
                } else {
                    return Err(FlicError::Corrupted);
                }
            }
        }
    }

    dst.buf[0..npixels].copy_from_slice(&scratch[..]);
    dst.mark_all_dirty();

    Ok(())
}
