//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! binary data from a byte slice in the byte order the file declares.

use zerocopy::FromBytes;

use crate::{Endian, Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// Multi-byte integers are decoded using the reader's [`Endian`], which can be
/// switched after the byte-order mark has been read.
///
/// # Example
///
/// ```
/// use themer_common::{BinaryReader, Endian};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data, Endian::Little);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// reader.set_endian(Endian::Big);
/// assert_eq!(reader.read_u32().unwrap(), 0x05060708);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize, endian: Endian) -> Self {
        Self {
            data,
            position,
            endian,
        }
    }

    /// Byte order used for multi-byte reads.
    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Change the byte order used for subsequent reads.
    #[inline]
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Advance the position by a number of bytes.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let endian = self.endian;
        self.read_bytes(2).map(|b| endian.read_u16(b))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let endian = self.endian;
        self.read_bytes(4).map(|b| endian.read_u32(b))
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let endian = self.endian;
        self.read_bytes(8).map(|b| endian.read_u64(b))
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        let endian = self.endian;
        self.read_bytes(4).map(|b| endian.read_f32(b))
    }

    /// Read a byte-order mark and switch the reader to it.
    pub fn read_bom(&mut self) -> Result<Endian> {
        let endian = Endian::from_bom(self.read_array()?)?;
        self.endian = endian;
        Ok(endian)
    }

    /// Read a null-terminated string.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let remaining = &self.data[self.position.min(self.data.len())..];

        let null_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        let string_bytes = &remaining[..null_pos];
        self.position += null_pos + 1;

        std::str::from_utf8(string_bytes).map_err(Error::Utf8)
    }

    /// Read a string from a fixed-size buffer, stopping at the first null.
    pub fn read_string_in_buffer(&mut self, buffer_size: usize) -> Result<&'a str> {
        let bytes = self.read_bytes(buffer_size)?;
        let end = memchr::memchr(0, bytes).unwrap_or(buffer_size);
        std::str::from_utf8(&bytes[..end]).map_err(Error::Utf8)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct's own field types decide the byte order; this is used for
    /// formats that are little-endian only.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32 LE: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, // u32: 0xFFFFFFFF
        ];
        let mut reader = BinaryReader::new(&data, Endian::Little);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u32().unwrap(), 0xFFFFFFFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_big_endian() {
        let data = [0x12, 0x34, 0x3F, 0x80, 0x00, 0x00];
        let mut reader = BinaryReader::new(&data, Endian::Big);

        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_f32().unwrap(), 1.0);
    }

    #[test]
    fn test_read_bom_switches_endian() {
        let data = [0xFE, 0xFF, 0x00, 0x01];
        let mut reader = BinaryReader::new(&data, Endian::Little);

        assert_eq!(reader.read_bom().unwrap(), Endian::Big);
        assert_eq!(reader.read_u16().unwrap(), 1);
    }

    #[test]
    fn test_read_cstring() {
        let data = b"hello\0world\0";
        let mut reader = BinaryReader::new(data, Endian::Little);

        assert_eq!(reader.read_cstring().unwrap(), "hello");
        assert_eq!(reader.read_cstring().unwrap(), "world");
        assert!(reader.read_cstring().is_err());
    }

    #[test]
    fn test_string_in_buffer() {
        let data = b"RootPane\0\0\0\0tail";
        let mut reader = BinaryReader::new(data, Endian::Little);

        assert_eq!(reader.read_string_in_buffer(12).unwrap(), "RootPane");
        assert_eq!(reader.position(), 12);
    }

    #[test]
    fn test_expect_magic() {
        let mut reader = BinaryReader::new(b"SARC", Endian::Little);
        assert!(reader.expect_magic(b"SARC").is_ok());

        let mut reader = BinaryReader::new(b"FLYT", Endian::Little);
        assert!(matches!(
            reader.expect_magic(b"SARC"),
            Err(Error::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data, Endian::Little);

        assert!(reader.read_u32().is_err());
    }
}
