//! Common utilities for themer.
//!
//! This crate provides the foundational types shared by every format crate:
//!
//! - [`Endian`] - Byte order declared by a file's byte-order mark
//! - [`BinaryReader`] - Endian-aware zero-copy reading from byte slices
//! - [`BinaryWriter`] - Endian-aware writing into a growable buffer
//! - [`align_up`] - Alignment arithmetic used by every container format

mod endian;
mod error;
mod reader;
mod writer;

pub use endian::Endian;
pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for string table scanning
pub use memchr;

/// Round `value` up to the next multiple of `alignment`.
///
/// An alignment of zero or one leaves the value unchanged.
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return value;
    }
    value.div_ceil(alignment) * alignment
}
