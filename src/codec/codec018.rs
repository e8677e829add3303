//! Codec for chunk type 18 = FLI_PSTAMP.

/// Magic for a FLI_PSTAMP chunk - Postage Stamp Image.
///
/// A thumbnail of the animation for file browsers, usually found in
/// the first frame only.  It has no effect on playback and its data
/// is skipped.
pub const FLI_PSTAMP: u16 = 18;
