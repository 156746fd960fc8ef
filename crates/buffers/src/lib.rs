//! Binary buffer primitives shared by the ferry codecs.
//!
//! The ferry wire formats are little-endian throughout; every multi-byte
//! write and read in this crate is little-endian, and text travels as
//! UTF-16LE code units.

mod reader;
mod region;
mod writer;

pub use reader::Reader;
pub use region::Region;
pub use writer::Writer;

use thiserror::Error;

/// Errors surfaced by the bounds-checked reader and the growable region.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A read would cross the end of the buffer.
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    /// A UTF-16 payload contained an unpaired surrogate.
    #[error("invalid utf-16 payload")]
    InvalidUtf16,
    /// A region could not be grown to the requested size.
    #[error("region capacity exhausted")]
    RegionExhausted,
}
