//! Codec for chunk type 16 = FLI_COPY.

use ::{FlicError,FlicResult,RasterMut};

/// Magic for a FLI_COPY chunk - No Compression.
///
/// The raw frame, width times height pixels, rows from top to bottom.
/// Encoders fall back to it when neither BRUN nor SS2 would be
/// smaller.
pub const FLI_COPY: u16 = 16;

/// Decode a FLI_COPY chunk.
///
/// Trailing bytes beyond width times height are ignored.
pub fn decode_fli_copy(src: &[u8], dst: &mut RasterMut)
        -> FlicResult<()> {
    let size = dst.w * dst.h;
    if src.len() < size {
        return Err(FlicError::Corrupted);
    }

    dst.buf[0..size].copy_from_slice(&src[0..size]);
    dst.mark_all_dirty();

    Ok(())
}
