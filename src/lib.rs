//! This crate provides an incremental decoder for Autodesk Animator
//! Pro FLC animations, for playback loops that repaint only the
//! regions touched by each frame.
//!
//! The decoder owns the byte stream, a single 8-bit indexed surface,
//! the 256 colour palette, and the list of dirty rectangles produced
//! by the most recent frame.

extern crate byteorder;
extern crate libc;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

pub use codec::*;
pub use errcode::FlicError;
pub use errcode::FlicResult;
pub use flic::{FlicDecoder,FlicOptions};
pub use flic::{FCID_FRAME,FLIHR_MAGIC,SIZE_OF_CHUNK,SIZE_OF_FLIC_FRAME,SIZE_OF_FLIC_HEADER};

pub mod codec;
pub mod errcode;
pub mod ffi;
pub mod flic;

mod raster;

#[cfg(test)]
mod testutil;

/// Number of entries in a FLIC palette.
pub const NUM_COLS: usize = 256;

/// A rectangular region of the surface.
///
/// The right and bottom edges are exclusive.
#[derive(Clone,Copy,Debug,Eq,PartialEq)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

/// An 8-bit indexed frame buffer, owned by the decoder.
///
/// The stride is always equal to the width.
#[derive(Clone,Debug)]
pub struct Surface {
    w: usize,
    h: usize,
    buf: Vec<u8>,
}

/// The colour palette, as 256 RGB triples.
#[derive(Clone)]
pub struct Palette {
    pal: [u8; 3 * NUM_COLS],
}

/// Mutable view over the decoder's state, handed to the chunk
/// decoders.
///
/// Codecs that only touch part of the frame append to `dirty`.
/// Codecs that redraw everything replace it.
pub struct RasterMut<'a> {
    pub w: usize,
    pub h: usize,
    pub buf: &'a mut [u8],
    pub pal: &'a mut [u8],
    pub dirty: &'a mut Vec<Rect>,
}
