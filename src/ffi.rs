//! Foreign function interface.

use std::ffi::CStr;
use std::fs;
use std::io::Cursor;
use std::ptr;
use std::slice;
use libc::{c_char,c_int,c_uint,size_t};

use ::{FlicDecoder,FlicOptions,FlicResult,NUM_COLS};

/// Decoder handle, over an in-memory copy of the file.
pub type CFlicDecoder = FlicDecoder<Cursor<Vec<u8>>>;

/// Returned by flicdec_decode_next_frame after the last frame.
pub const FLICDEC_ENDED: c_uint = 2;

/// Returned by flicdec_decode_next_frame if the palette is dirty.
pub const FLICDEC_PALETTE_UPDATED: c_uint = 8;

// Log with "file:line - " prefix, for more informative error messages.
macro_rules! printerrorln {
    ($e:expr) => {
        error!("{}:{} - {}", file!(), line!(), $e);
    };
}

fn open_buffer(buf: Vec<u8>, options: FlicOptions)
        -> *mut CFlicDecoder {
    match FlicDecoder::with_options(Cursor::new(buf), options) {
        Ok(f) => Box::into_raw(Box::new(f)),
        Err(e) => {
            printerrorln!(e);
            ptr::null_mut()
        },
    }
}

fn run<F>(file: &'static str, line: u32, f: F)
        -> c_uint
        where F: FnOnce() -> FlicResult<c_uint> {
    match f() {
        Ok(r) => r,
        Err(e) => {
            error!("{}:{} - {}", file, line, e);
            1
        },
    }
}

/// Open a FLC file.  Returns null on failure.
#[no_mangle]
pub extern "C" fn flicdec_open(filename: *const c_char)
        -> *mut CFlicDecoder {
    if filename.is_null() {
        printerrorln!("bad input parameters");
        return ptr::null_mut();
    }

    let cstr = unsafe{ CStr::from_ptr(filename) };
    match cstr.to_str() {
        Ok(s) => match fs::read(s) {
            Ok(buf) => open_buffer(buf, FlicOptions::default()),
            Err(e) => {
                printerrorln!(e);
                ptr::null_mut()
            },
        },
        Err(e) => {
            printerrorln!(e);
            ptr::null_mut()
        },
    }
}

/// Open a FLC file held in memory.  The data is copied.  Returns
/// null on failure.
#[no_mangle]
pub extern "C" fn flicdec_open_memory(
        src: *const u8, src_len: size_t, strict_chunk_sizes: c_uint)
        -> *mut CFlicDecoder {
    if src.is_null() {
        printerrorln!("bad input parameters");
        return ptr::null_mut();
    }

    let src_slice = unsafe{ slice::from_raw_parts(src, src_len) };
    let options = FlicOptions::new().strict_chunk_sizes(strict_chunk_sizes != 0);
    open_buffer(src_slice.to_vec(), options)
}

/// Close a FLC decoder.
#[no_mangle]
pub extern "C" fn flicdec_close(flic: *mut CFlicDecoder) {
    if flic.is_null() {
        return;
    }

    let _flic = unsafe{ Box::from_raw(flic) };
}

/// Decode the next frame.
///
/// Returns 1 on failure, otherwise a combination of FLICDEC_ENDED
/// and FLICDEC_PALETTE_UPDATED.
#[no_mangle]
pub extern "C" fn flicdec_decode_next_frame(flic: *mut CFlicDecoder)
        -> c_uint {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 1;
    }

    let flic = unsafe{ &mut *flic };
    run(file!(), line!(), || {
        flic.decode_next_frame()?;
        Ok(0
            + (if flic.end_of_track() { FLICDEC_ENDED } else { 0 })
            + (if flic.is_palette_dirty() { FLICDEC_PALETTE_UPDATED } else { 0 }))
    })
}

/// Restart the track.  Returns 0 on success.
#[no_mangle]
pub extern "C" fn flicdec_rewind(flic: *mut CFlicDecoder)
        -> c_uint {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 1;
    }

    let flic = unsafe{ &mut *flic };
    run(file!(), line!(), || {
        flic.rewind()?;
        Ok(0)
    })
}

/// Get the frame count, not including the ring frame.
#[no_mangle]
pub extern "C" fn flicdec_frame_count(flic: *const CFlicDecoder)
        -> c_uint {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 0;
    }

    let flic = unsafe{ &*flic };
    flic.frame_count() as c_uint
}

/// Get the last decoded frame number, or -1.
#[no_mangle]
pub extern "C" fn flicdec_current_frame(flic: *const CFlicDecoder)
        -> c_int {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return -1;
    }

    let flic = unsafe{ &*flic };
    flic.current_frame() as c_int
}

/// Returns 1 once the last frame has been decoded.
#[no_mangle]
pub extern "C" fn flicdec_end_of_track(flic: *const CFlicDecoder)
        -> c_uint {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 1;
    }

    let flic = unsafe{ &*flic };
    if flic.end_of_track() { 1 } else { 0 }
}

/// Get the current surface width.
#[no_mangle]
pub extern "C" fn flicdec_width(flic: *const CFlicDecoder)
        -> size_t {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 0;
    }

    let flic = unsafe{ &*flic };
    flic.width() as size_t
}

/// Get the current surface height.
#[no_mangle]
pub extern "C" fn flicdec_height(flic: *const CFlicDecoder)
        -> size_t {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 0;
    }

    let flic = unsafe{ &*flic };
    flic.height() as size_t
}

/// Number of milliseconds to delay after the current frame.
#[no_mangle]
pub extern "C" fn flicdec_frame_delay(flic: *const CFlicDecoder)
        -> c_uint {
    if flic.is_null() {
        printerrorln!("bad input parameters");
        return 0;
    }

    let flic = unsafe{ &*flic };
    flic.frame_delay() as c_uint
}

/// Copy the palette, as 256 RGB triples, and clear its dirty flag.
#[no_mangle]
pub extern "C" fn flicdec_copy_palette(
        flic: *mut CFlicDecoder, dst: *mut u8, dst_len: size_t)
        -> c_uint {
    if flic.is_null() || dst.is_null() || dst_len < 3 * NUM_COLS {
        printerrorln!("bad input parameters");
        return 1;
    }

    let flic = unsafe{ &mut *flic };
    let dst_slice = unsafe{ slice::from_raw_parts_mut(dst, dst_len) };
    dst_slice[0..(3 * NUM_COLS)].copy_from_slice(flic.palette().as_bytes());
    flic.clear_palette_dirty();
    0
}

/// Copy the dirty rectangles into a screen buffer, then clear them.
#[no_mangle]
pub extern "C" fn flicdec_copy_dirty_rects_to_buffer(
        flic: *mut CFlicDecoder, dst: *mut u8, dst_len: size_t, pitch: size_t)
        -> c_uint {
    if flic.is_null() || dst.is_null() {
        printerrorln!("bad input parameters");
        return 1;
    }

    let flic = unsafe{ &mut *flic };
    let dst_slice = unsafe{ slice::from_raw_parts_mut(dst, dst_len) };
    run(file!(), line!(), || {
        flic.copy_dirty_rects_to_buffer(dst_slice, pitch)?;
        Ok(0)
    })
}
