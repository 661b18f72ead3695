//! Byte order handling.

use std::fmt;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{Error, Result};

/// Byte order of a binary file.
///
/// Nintendo formats declare their byte order with a two-byte BOM that holds
/// `0xFEFF` in the file's own endianness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Big-endian (Wii U era files).
    Big,
    /// Little-endian (Switch era files).
    #[default]
    Little,
}

impl Endian {
    /// Decode a byte-order mark.
    pub fn from_bom(bom: [u8; 2]) -> Result<Self> {
        match bom {
            [0xFE, 0xFF] => Ok(Self::Big),
            [0xFF, 0xFE] => Ok(Self::Little),
            other => Err(Error::InvalidBom(other)),
        }
    }

    /// The byte-order mark for this endianness.
    pub const fn bom(self) -> [u8; 2] {
        match self {
            Self::Big => [0xFE, 0xFF],
            Self::Little => [0xFF, 0xFE],
        }
    }

    #[inline]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Self::Big => BigEndian::read_u16(buf),
            Self::Little => LittleEndian::read_u16(buf),
        }
    }

    #[inline]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Self::Big => BigEndian::read_u32(buf),
            Self::Little => LittleEndian::read_u32(buf),
        }
    }

    #[inline]
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Self::Big => BigEndian::read_u64(buf),
            Self::Little => LittleEndian::read_u64(buf),
        }
    }

    #[inline]
    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Self::Big => BigEndian::read_f32(buf),
            Self::Little => LittleEndian::read_f32(buf),
        }
    }

    #[inline]
    pub fn write_u16(self, buf: &mut [u8], value: u16) {
        match self {
            Self::Big => BigEndian::write_u16(buf, value),
            Self::Little => LittleEndian::write_u16(buf, value),
        }
    }

    #[inline]
    pub fn write_u32(self, buf: &mut [u8], value: u32) {
        match self {
            Self::Big => BigEndian::write_u32(buf, value),
            Self::Little => LittleEndian::write_u32(buf, value),
        }
    }

    #[inline]
    pub fn write_u64(self, buf: &mut [u8], value: u64) {
        match self {
            Self::Big => BigEndian::write_u64(buf, value),
            Self::Little => LittleEndian::write_u64(buf, value),
        }
    }

    #[inline]
    pub fn write_f32(self, buf: &mut [u8], value: f32) {
        match self {
            Self::Big => BigEndian::write_f32(buf, value),
            Self::Little => LittleEndian::write_f32(buf, value),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => f.write_str("big"),
            Self::Little => f.write_str("little"),
        }
    }
}
