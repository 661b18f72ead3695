//! Texture handling for themer.
//!
//! Theme packs ship their background as a block-compressed DDS image, while
//! the firmware reads textures from BNTX containers in the GPU's
//! block-linear layout. This crate bridges the two:
//!
//! - [`Dds`] - Reads BC1/BC3 DDS files (legacy four-cc or DX10 header)
//! - [`swizzle`] - Tegra block-linear addressing
//! - [`Bntx`] - Replaces a named texture inside a BNTX in place
//!
//! # Example
//!
//! ```no_run
//! use themer_texture::{Bntx, Dds};
//!
//! let dds = Dds::parse(&std::fs::read("image.dds")?)?;
//! let mut bntx = Bntx::parse(&std::fs::read("__Combined.bntx")?)?;
//! bntx.replace_texture("White1x1A128^s", &dds)?;
//! std::fs::write("__Combined.bntx", bntx.into_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bntx;
mod dds;
mod error;
pub mod swizzle;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use bntx::{Bntx, TextureInfo};
pub use dds::{mipmap_size, Dds, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC, TextureFormat, DDS_MAGIC};
pub use error::{Error, Result};
