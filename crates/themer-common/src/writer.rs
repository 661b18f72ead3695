//! Binary writer for building files in memory.

use crate::{align_up, Endian, Error, Result};

/// An endian-aware writer backed by a growable buffer.
///
/// Offsets that are only known after later data has been laid out can be
/// reserved with a placeholder and patched with the `*_at` methods.
#[derive(Debug, Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
    endian: Endian,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new(endian: Endian) -> Self {
        Self {
            buf: Vec::new(),
            endian,
        }
    }

    /// Create an empty writer with reserved capacity.
    pub fn with_capacity(endian: Endian, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            endian,
        }
    }

    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Current write position (equal to the buffer length).
    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut b = [0u8; 2];
        self.endian.write_u16(&mut b, value);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut b = [0u8; 4];
        self.endian.write_u32(&mut b, value);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_u64(&mut self, value: u64) {
        let mut b = [0u8; 8];
        self.endian.write_u64(&mut b, value);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_f32(&mut self, value: f32) {
        let mut b = [0u8; 4];
        self.endian.write_f32(&mut b, value);
        self.buf.extend_from_slice(&b);
    }

    /// Write the byte-order mark for this writer's endianness.
    pub fn write_bom(&mut self) {
        self.buf.extend_from_slice(&self.endian.bom());
    }

    /// Write a string followed by a null terminator.
    pub fn write_cstring(&mut self, value: &str) {
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);
    }

    /// Write a string into a fixed-size, null-padded field.
    ///
    /// Strings longer than the field are truncated.
    pub fn write_fixed_string(&mut self, value: &str, size: usize) {
        let bytes = value.as_bytes();
        let len = bytes.len().min(size);
        self.buf.extend_from_slice(&bytes[..len]);
        self.buf.resize(self.buf.len() + (size - len), 0);
    }

    /// Pad with `fill` until the position is a multiple of `alignment`.
    pub fn align(&mut self, alignment: usize, fill: u8) {
        let target = align_up(self.buf.len(), alignment);
        self.buf.resize(target, fill);
    }

    /// Pad with zeroes up to an absolute position.
    pub fn pad_to(&mut self, position: usize) {
        if position > self.buf.len() {
            self.buf.resize(position, 0);
        }
    }

    pub fn write_u16_at(&mut self, offset: usize, value: u16) -> Result<()> {
        let endian = self.endian;
        endian.write_u16(self.slot(offset, 2)?, value);
        Ok(())
    }

    pub fn write_u32_at(&mut self, offset: usize, value: u32) -> Result<()> {
        let endian = self.endian;
        endian.write_u32(self.slot(offset, 4)?, value);
        Ok(())
    }

    pub fn write_u64_at(&mut self, offset: usize, value: u64) -> Result<()> {
        let endian = self.endian;
        endian.write_u64(self.slot(offset, 8)?, value);
        Ok(())
    }

    /// Consume the writer and return the buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    fn slot(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        let size = self.buf.len();
        self.buf
            .get_mut(offset..offset + len)
            .ok_or(Error::WriteOutOfBounds { offset, len, size })
    }
}
