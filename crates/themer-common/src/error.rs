//! Error types for themer-common.

use thiserror::Error;

/// Common error type for themer binary operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// Byte-order mark was neither `FE FF` nor `FF FE`.
    #[error("invalid byte-order mark: {0:02x?}")]
    InvalidBom([u8; 2]),

    /// Write past the end of an already-written region.
    #[error("write out of bounds: offset {offset} + {len} exceeds buffer of {size} bytes")]
    WriteOutOfBounds { offset: usize, len: usize, size: usize },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Missing null terminator in string.
    #[error("string missing null terminator")]
    MissingNullTerminator,
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
