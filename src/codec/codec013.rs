//! Codec for chunk type 13 = FLI_BLACK.

use ::RasterMut;

/// Magic for a FLI_BLACK chunk - No Data.
///
/// Clears the frame to colour index 0.  The chunk is header only.
pub const FLI_BLACK: u16 = 13;

/// Decode a FLI_BLACK chunk.
pub fn decode_fli_black(dst: &mut RasterMut) {
    let end = dst.w * dst.h;
    for e in &mut dst.buf[0..end] {
        *e = 0;
    }

    dst.mark_all_dirty();
}
