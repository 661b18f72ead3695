//! Themer - applies theme packs to console UI archives.
//!
//! A theme pack is an SZS archive carrying a background image (`image.dds`)
//! and optionally a custom layout patch (`layout.json`). Patching a target
//! UI archive runs these steps in order:
//!
//! 1. Validate the theme pack
//! 2. Detect which [`PatchTemplate`] fits the target
//! 3. Insert the background pane into the target's layout
//! 4. Replace the template's texture with the theme image
//! 5. Check and apply the layout patch, if the pack has one
//! 6. Repack and compress the archive
//!
//! # Crates
//!
//! - [`themer_common`] - Binary reading and writing
//! - [`themer_yaz0`] - Yaz0 compression
//! - [`themer_sarc`] - SARC archives
//! - [`themer_layout`] - BFLYT layouts and layout patches
//! - [`themer_texture`] - DDS images and BNTX texture containers
//!
//! # Example
//!
//! ```no_run
//! use themer::{PatchOptions, Silent, ThemePatcher};
//!
//! let theme = std::fs::read("theme.szs")?;
//! let target = std::fs::read("ResidentMenu.szs")?;
//!
//! let output = ThemePatcher::new(PatchOptions::default()).patch(&theme, &target, &mut Silent)?;
//! std::fs::write(output.file_name(), &output.data)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use themer_common as common;
pub use themer_layout as layout;
pub use themer_sarc as sarc;
pub use themer_texture as texture;
pub use themer_yaz0 as yaz0;

mod error;
mod patcher;
pub mod pipeline;
pub mod szs;
pub mod template;
mod theme;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use error::{ArchiveError, Error, Result, Stage, StageError};
pub use patcher::{PatchOptions, PatchOutput, Reporter, Silent, ThemePatcher, DEFAULT_COMPRESSION_LEVEL};
pub use template::{detect, PatchTemplate, DEFAULT_TEMPLATES};
pub use theme::{ThemePack, IMAGE_ENTRY, LAYOUT_ENTRY};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
