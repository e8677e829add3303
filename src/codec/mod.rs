//! FLIC decoding subroutines.

macro_rules! module {
    ($e:ident) => {
        pub use self::$e::*;
        mod $e;
    };
}

use ::{FlicError,FlicResult,RasterMut};

module!(codec004);
module!(codec007);
module!(codec013);
module!(codec015);
module!(codec016);
module!(codec018);

/// Returns true if the chunk type modifies the palette.
pub fn chunk_modifies_palette(magic: u16)
        -> bool {
    magic == FLI_COLOR256
}

/// Decode a chunk, based on the chunk type.
pub fn decode_chunk(magic: u16, buf: &[u8], dst: &mut RasterMut)
        -> FlicResult<()> {
    match magic {
        FLI_COLOR256 => decode_fli_color256(&buf, dst)?,
        FLI_SS2 => decode_fli_ss2(&buf, dst)?,
        FLI_BLACK => decode_fli_black(dst),
        FLI_BRUN => decode_fli_brun(&buf, dst)?,
        FLI_COPY => decode_fli_copy(&buf, dst)?,
        FLI_PSTAMP => (),
        _ => return Err(FlicError::UnsupportedChunk(magic)),
    }

    Ok(())
}
