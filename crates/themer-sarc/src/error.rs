//! Error types for the SARC crate.

use thiserror::Error;

/// Errors that can occur when reading or writing SARC archives.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] themer_common::Error),

    /// Unexpected header length.
    #[error("invalid {section} header length: expected {expected:#x}, got {actual:#x}")]
    InvalidHeaderLength {
        section: &'static str,
        expected: u16,
        actual: u16,
    },

    /// Two nodes resolve to the same file name.
    #[error("duplicate file name in archive: {0}")]
    DuplicateName(String),

    /// A node's data range lies outside the file.
    #[error("data range {start:#x}..{end:#x} of {name} exceeds archive size {size:#x}")]
    DataOutOfRange {
        name: String,
        start: usize,
        end: usize,
        size: usize,
    },

    /// A name offset points outside the name table.
    #[error("name offset {0:#x} is outside the name table")]
    NameOutOfRange(usize),

    /// A hash-only archive holds a name that does not encode a hash.
    #[error("cannot recover a name hash from {0:?} in a hash-only archive")]
    InvalidHashName(String),
}

/// Result type for SARC operations.
pub type Result<T> = std::result::Result<T, Error>;
