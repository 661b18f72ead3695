//! BFLYT layout handling for themer.
//!
//! BFLYT files describe a UI scene graph as a flat list of sections. Panes
//! (`pan1`, `pic1`, `txt1`, ...) appear in draw order and are nested with
//! `pas1`/`pae1` markers; they reference materials (`mat1`) which in turn
//! reference textures by index into the texture list (`txl1`).
//!
//! This crate provides:
//!
//! - [`BflytFile`] - Section-level parser and writer that carries unknown
//!   sections verbatim
//! - [`Pane`], [`TextureList`], [`MaterialList`] - Typed views over the
//!   sections themes need to edit
//! - [`BackgroundPatch`] - Inserts a full-screen background picture pane
//! - [`LayoutPatch`] - JSON-described pane edits authored by theme makers
//!
//! # Example
//!
//! ```no_run
//! use themer_layout::{BackgroundPatch, BflytFile};
//!
//! let data = std::fs::read("RdtBase.bflyt")?;
//! let mut layout = BflytFile::parse(&data)?;
//!
//! layout.patch_background(&BackgroundPatch {
//!     pane_name: "exelixBG",
//!     texture_name: "White1x1A128^s",
//!     target_panes: &["L_BgNml"],
//!     keep_target_panes: false,
//! })?;
//!
//! std::fs::write("RdtBase.patched.bflyt", layout.to_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod background;
mod error;
mod file;
mod material;
mod pane;
mod patch;
mod texture_list;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use background::BackgroundPatch;
pub use error::{Error, Result};
pub use file::{BflytFile, Section};
pub use material::{Material, MaterialList};
pub use pane::{picture_color, picture_section, set_picture_color, Corner, Pane, Rgba, Vec2, Vec3};
pub use patch::{FilePatch, LayoutPatch, PanePatch};
pub use texture_list::TextureList;
