//! Error types for texture handling.

use thiserror::Error;

/// Errors that can occur when reading DDS files or patching BNTX containers.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] themer_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidDdsMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// The DDS pixel format has no BNTX counterpart.
    #[error("unsupported DDS format: {0}")]
    UnsupportedFormat(String),

    /// The DDS file ends before its last mipmap.
    #[error("mipmap size mismatch: expected {expected} bytes, got {actual}")]
    MipmapSizeMismatch { expected: usize, actual: usize },

    /// Structural problem in a BNTX container.
    #[error("invalid BNTX: {0}")]
    InvalidBntx(String),

    /// No texture with this name in the container.
    #[error("texture not found: {0}")]
    TextureNotFound(String),
}

/// Result type for texture operations.
pub type Result<T> = std::result::Result<T, Error>;
