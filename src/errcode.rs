//! FLIC error codes.

use std::io;

pub type FlicResult<T> = Result<T, FlicError>;

quick_error! {
    #[derive(Debug)]
    pub enum FlicError {
        /// The stream does not start with an Animator Pro FLC header.
        BadMagic(magic: u16) {
            description("Bad magic")
            display("Bad magic 0x{:04X}", magic)
        }

        /// Valid header, but the colour depth is not 8 bits per pixel.
        UnsupportedDepth(depth: u16) {
            description("Unsupported colour depth")
            display("Unsupported colour depth {}", depth)
        }

        /// Unknown frame chunk or sub-chunk type.  Chunk boundaries
        /// cannot be verified independently, so decoding cannot resume.
        UnsupportedChunk(magic: u16) {
            description("Unsupported chunk type")
            display("Unsupported chunk type 0x{:04X}", magic)
        }

        /// The chunk data disagrees with the frame or with itself.
        Corrupted {
            description("Corrupted")
            display("Corrupted")
        }

        /// The caller's buffer does not fit the frame.
        WrongResolution {
            description("Wrong resolution")
            display("Wrong resolution")
        }

        Io(err: io::Error) {
            from()
            description("IO error")
            display("IO error: {}", err)
            cause(err)
        }
    }
}
