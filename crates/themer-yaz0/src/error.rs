//! Error types for the Yaz0 codec.

use thiserror::Error;

/// Errors that can occur while decoding Yaz0 data.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer too small to hold a header.
    #[error("buffer too small for a Yaz0 header: {0} bytes")]
    TooSmall(usize),

    /// Invalid Yaz0 magic.
    #[error("invalid Yaz0 magic: expected 'Yaz0', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Compressed stream ended before the declared size was produced.
    #[error("truncated Yaz0 stream at offset {offset}: produced {produced} of {expected} bytes")]
    Truncated {
        offset: usize,
        produced: usize,
        expected: usize,
    },

    /// Back reference points before the start of the output.
    #[error("back reference distance {distance} exceeds {available} decoded bytes")]
    InvalidBackReference { distance: usize, available: usize },

    /// Decoded data overran the declared size.
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Result type for Yaz0 operations.
pub type Result<T> = std::result::Result<T, Error>;
