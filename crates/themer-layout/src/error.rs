//! Error types for layout handling.

use thiserror::Error;

/// Errors that can occur when reading, patching or writing layouts.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] themer_common::Error),

    /// A section declares a size smaller than its header or past the end of the file.
    #[error("invalid size {size:#x} for section {magic} at offset {offset:#x}")]
    InvalidSectionSize {
        magic: String,
        offset: usize,
        size: usize,
    },

    /// A required section is absent.
    #[error("layout has no {0} section")]
    MissingSection(&'static str),

    /// The background pane is already present.
    #[error("layout is already patched (pane {0} exists)")]
    AlreadyPatched(String),

    /// A pane referenced by name does not exist.
    #[error("pane not found: {0}")]
    MissingPane(String),

    /// A texture referenced by name is not in the texture list.
    #[error("texture not found in texture list: {0}")]
    MissingTexture(String),

    /// A layout file referenced by a patch is not in the archive.
    #[error("layout file not found in archive: {0}")]
    MissingFile(String),

    /// A picture-only edit targets a pane of another kind.
    #[error("pane {0} is not a picture pane")]
    NotAPicture(String),

    /// A color string is not `RRGGBBAA` hex.
    #[error("invalid color {0:?}: expected RRGGBBAA hex")]
    InvalidColor(String),

    /// An origin value outside left/center/right (or top/center/bottom).
    #[error("invalid {field} {value} for pane {pane}: expected 0, 1 or 2")]
    InvalidOrigin {
        pane: String,
        field: &'static str,
        value: u8,
    },

    /// A table grew beyond what its count field can hold.
    #[error("too many entries in {0}")]
    TooManyEntries(&'static str),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A layout patch without any file edits.
    #[error("layout patch contains no file edits")]
    EmptyPatch,
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, Error>;
