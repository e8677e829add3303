//! Codec for chunk type 4 = FLI_COLOR256.

use std::io::{Cursor,Read};
use byteorder::LittleEndian as LE;
use byteorder::{ByteOrder,ReadBytesExt};

use ::{FlicError,FlicResult,NUM_COLS,RasterMut};

/// Magic for a FLI_COLOR256 chunk - 256-Level Color.
///
/// Palette changes, 8 bits per component.  The chunk starts with a
/// word holding the number of packets.  A packet is a skip byte, a
/// change byte, and then `change` RGB triples.
///
/// A cursor into the palette starts at entry 0.  Each packet first
/// moves the cursor forward by its skip, then stores its triples at
/// consecutive entries, leaving the cursor just past the last one.
/// For example, setting entries 1, 5 and 6:
///
/// ```text
///     2                   ; packets
///     1,1,r,g,b           ; entry 1
///     3,2,r,g,b,r,g,b     ; entries 5 and 6
/// ```
///
/// When the first packet is skip 0, change 0, the whole palette
/// follows as 256 triples and the packet count is not consulted.
/// Any other packet with a change of 0 sets no entries.
///
/// A packet that would move the cursor past the last entry is
/// rejected, rather than wrapping back to entry 0.  The palette is
/// left untouched when the chunk is rejected.
pub const FLI_COLOR256: u16 = 4;

/// Decode a FLI_COLOR256 chunk.
pub fn decode_fli_color256(src: &[u8], dst: &mut RasterMut)
        -> FlicResult<()> {
    let mut r = Cursor::new(src);
    let mut pal = [0; 3 * NUM_COLS];
    pal.copy_from_slice(dst.pal);

    let count = r.read_u16::<LE>()?;

    if src.len() >= 4 && LE::read_u16(&src[2..4]) == 0 {
        r.set_position(4);
        r.read_exact(&mut pal[..])?;
    } else {
        let mut idx0 = 0;
        for _ in 0..count {
            let nskip = r.read_u8()? as usize;
            let ncopy = r.read_u8()? as usize;

            let start = idx0 + 3 * nskip;
            let end = start + 3 * ncopy;
            if end > pal.len() {
                return Err(FlicError::Corrupted);
            }

            r.read_exact(&mut pal[start..end])?;

            idx0 = end;
        }
    }

    dst.pal.copy_from_slice(&pal[..]);
    Ok(())
}
