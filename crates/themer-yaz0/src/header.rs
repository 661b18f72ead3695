//! Yaz0 header structure.

use zerocopy::byteorder::big_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Yaz0 file header.
///
/// All fields are big-endian regardless of the payload's own byte order.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Header {
    /// Magic bytes (`Yaz0`).
    pub magic: [u8; 4],
    /// Size of the data once decompressed.
    pub decompressed_size: U32,
    /// Alignment the decompressed buffer must be loaded at (0 when unset).
    pub alignment: U32,
    /// Reserved.
    pub reserved: U32,
}

impl Header {
    /// The magic bytes at the start of a Yaz0 stream.
    pub const MAGIC: &'static [u8; 4] = b"Yaz0";

    /// Size of the header in bytes.
    pub const SIZE: usize = 16;

    /// Create a header for a payload of the given size.
    pub fn new(decompressed_size: u32, alignment: u32) -> Self {
        Self {
            magic: *Self::MAGIC,
            decompressed_size: U32::new(decompressed_size),
            alignment: U32::new(alignment),
            reserved: U32::new(0),
        }
    }

    /// Parse and validate the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::TooSmall(data.len()));
        }

        let header = Self::read_from_bytes(&data[..Self::SIZE]).map_err(|_| Error::TooSmall(data.len()))?;
        if &header.magic != Self::MAGIC {
            return Err(Error::InvalidMagic(header.magic));
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = Header::new(0x1234, 0x80);
        let bytes = header.as_bytes();

        assert_eq!(bytes.len(), Header::SIZE);
        assert_eq!(&bytes[..4], b"Yaz0");
        assert_eq!(&bytes[4..8], &[0, 0, 0x12, 0x34]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 0x80]);
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut bytes = Header::new(4, 0).as_bytes().to_vec();
        bytes[0] = b'X';
        assert!(matches!(Header::parse(&bytes), Err(Error::InvalidMagic(_))));
        assert!(matches!(Header::parse(&bytes[..8]), Err(Error::TooSmall(8))));
    }
}
