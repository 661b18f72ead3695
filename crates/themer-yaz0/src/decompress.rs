//! Yaz0 decompression.

use tracing::trace;

use crate::{Error, Header, Result};

/// Decompress a Yaz0 stream, header included.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = Header::parse(data)?;
    let expected = header.decompressed_size.get() as usize;
    let src = &data[Header::SIZE..];

    trace!(expected, compressed = src.len(), "decompressing Yaz0 stream");

    // one source byte never expands to more than a maximal back reference
    let mut output = Vec::with_capacity(expected.min(src.len().saturating_mul(0x111)));
    let mut pos = 0usize;
    let mut code = 0u8;
    let mut bits_left = 0u32;

    let next = |pos: &mut usize, produced: usize| -> Result<u8> {
        let byte = *src.get(*pos).ok_or(Error::Truncated {
            offset: Header::SIZE + *pos,
            produced,
            expected,
        })?;
        *pos += 1;
        Ok(byte)
    };

    while output.len() < expected {
        if bits_left == 0 {
            code = next(&mut pos, output.len())?;
            bits_left = 8;
        }

        if code & 0x80 != 0 {
            let byte = next(&mut pos, output.len())?;
            output.push(byte);
        } else {
            let b1 = next(&mut pos, output.len())? as usize;
            let b2 = next(&mut pos, output.len())? as usize;

            let distance = ((b1 & 0x0F) << 8 | b2) + 1;
            let length = match b1 >> 4 {
                0 => next(&mut pos, output.len())? as usize + 0x12,
                n => n + 2,
            };

            if distance > output.len() {
                return Err(Error::InvalidBackReference {
                    distance,
                    available: output.len(),
                });
            }

            // Byte-wise copy: source and destination may overlap.
            let start = output.len() - distance;
            for i in 0..length {
                let byte = output[start + i];
                output.push(byte);
            }
        }

        code <<= 1;
        bits_left -= 1;
    }

    if output.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: output.len(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes;

    fn stream(size: u32, body: &[u8]) -> Vec<u8> {
        let mut data = Header::new(size, 0).as_bytes().to_vec();
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_literals() {
        let data = stream(3, &[0b1110_0000, b'a', b'b', b'c']);
        assert_eq!(decompress(&data).unwrap(), b"abc");
    }

    #[test]
    fn test_overlapping_back_reference() {
        // 'a' literal, then distance 1 length 5 -> "aaaaaa"
        let data = stream(6, &[0b1000_0000, b'a', 0x30, 0x00]);
        assert_eq!(decompress(&data).unwrap(), b"aaaaaa");
    }

    #[test]
    fn test_long_back_reference() {
        // 'x' literal, then distance 1 with a third length byte: 0x12 + 2 = 20
        let data = stream(21, &[0b1000_0000, b'x', 0x00, 0x00, 0x02]);
        assert_eq!(decompress(&data).unwrap(), vec![b'x'; 21]);
    }

    #[test]
    fn test_truncated_stream() {
        let data = stream(4, &[0b1111_0000, b'a', b'b']);
        assert!(matches!(decompress(&data), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_oversized_header_is_truncated() {
        let data = stream(u32::MAX, &[0b1000_0000, b'a']);
        assert!(matches!(decompress(&data), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_reference_before_start() {
        let data = stream(4, &[0b0000_0000, 0x20, 0x05]);
        assert!(matches!(
            decompress(&data),
            Err(Error::InvalidBackReference { .. })
        ));
    }

    #[test]
    fn test_overrun_is_rejected() {
        // literal 'a' then a 5-byte copy, but only 3 bytes declared
        let data = stream(3, &[0b1000_0000, b'a', 0x30, 0x00]);
        assert!(matches!(decompress(&data), Err(Error::SizeMismatch { .. })));
    }
}
