//! Error types for theme patching.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A mutating stage of the patch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Background pane insertion into the template's layout.
    BackgroundLayout,
    /// Replacement of the template's texture with the theme image.
    Texture,
    /// Application of the theme's custom layout patch.
    Overlay,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BackgroundLayout => "background layout",
            Self::Texture => "texture injection",
            Self::Overlay => "layout patch",
        })
    }
}

/// Why a pipeline stage failed.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Layout(#[from] themer_layout::Error),

    #[error(transparent)]
    Texture(#[from] themer_texture::Error),

    /// An entry the template relies on is not in the archive.
    #[error("file not found in archive: {0}")]
    MissingFile(String),
}

/// Failure to turn raw bytes into an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Yaz0(#[from] themer_yaz0::Error),

    #[error(transparent)]
    Sarc(#[from] themer_sarc::Error),
}

/// Errors that abort a patch run.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be read or written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The theme pack is unreadable or lacks its image.
    #[error("this theme pack is not valid: {0}")]
    InvalidThemePack(String),

    /// The target archive could not be decompressed or unpacked.
    #[error("cannot read the target archive: {0}")]
    InvalidTarget(#[source] ArchiveError),

    /// No built-in template matches the target archive.
    #[error("no compatible patch template found")]
    NoCompatibleTemplate,

    /// A pipeline stage failed.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: StageError,
    },

    /// The theme's layout patch does not parse or has no edits.
    #[error("invalid layout patch file: {0}")]
    InvalidOverlay(#[source] themer_layout::Error),

    /// The theme's layout patch does not fit the target archive.
    #[error("the layout patch is not compatible with this archive: {0}")]
    IncompatibleOverlay(#[source] themer_layout::Error),

    /// The patched archive could not be packed.
    #[error("failed to repack the archive: {0}")]
    Repack(#[from] themer_sarc::Error),
}

impl Error {
    pub(crate) fn stage(stage: Stage, source: impl Into<StageError>) -> Self {
        Self::Stage {
            stage,
            source: source.into(),
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileAccess { .. } | Self::InvalidThemePack(_) | Self::Repack(_) => 1,
            Self::InvalidTarget(_) | Self::NoCompatibleTemplate => 2,
            Self::Stage { stage, .. } => match stage {
                Stage::BackgroundLayout => 3,
                Stage::Texture => 4,
                Stage::Overlay => 7,
            },
            Self::InvalidOverlay(_) => 5,
            Self::IncompatibleOverlay(_) => 6,
        }
    }
}

/// Result type for theme patching.
pub type Result<T> = std::result::Result<T, Error>;
