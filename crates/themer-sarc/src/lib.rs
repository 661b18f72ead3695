//! SARC archive reader and writer.
//!
//! SARC is the flat container Nintendo uses for UI archives. Once Yaz0
//! compressed it is usually called an SZS file.
//!
//! # File Format
//!
//! - `SARC` header (0x14 bytes): byte-order mark, file size, data offset
//! - `SFAT` node table: one 16-byte node per file with its name hash, name
//!   offset attribute and data range
//! - `SFNT` name table: null-terminated names, each padded to 4 bytes
//! - file data, each payload aligned to what its format requires
//!
//! # Example
//!
//! ```
//! use themer_sarc::SarcArchive;
//! use themer_common::Endian;
//!
//! let mut archive = SarcArchive::new(Endian::Little);
//! archive.insert("blyt/BgNml.bflyt", b"FLYT".to_vec());
//!
//! let packed = archive.pack()?;
//! let unpacked = SarcArchive::unpack(&packed.data)?;
//! assert_eq!(unpacked.get("blyt/BgNml.bflyt"), Some(&b"FLYT"[..]));
//! # Ok::<(), themer_sarc::Error>(())
//! ```

mod align;
mod archive;
mod error;
mod format;
mod pack;
mod unpack;

pub use align::guess_alignment;
pub use archive::{SarcArchive, SarcFile};
pub use error::{Error, Result};
pub use format::{name_hash, HASH_KEY};
pub use pack::PackedSarc;
