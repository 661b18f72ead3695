//! DDS file reading.

use themer_common::{BinaryReader, Endian};
use tracing::trace;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: U32,
    /// Header flags.
    pub flags: U32,
    /// Image height.
    pub height: U32,
    /// Image width.
    pub width: U32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: U32,
    /// Depth (for volume textures).
    pub depth: U32,
    /// Number of mipmap levels.
    pub mipmap_count: U32,
    /// Reserved.
    pub reserved1: [U32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: U32,
    pub caps2: U32,
    pub caps3: U32,
    pub caps4: U32,
    /// Reserved.
    pub reserved2: U32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Check if this is a DX10 extended header.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.four_cc == FourCC::DX10
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: U32,
    /// Pixel format flags.
    pub flags: U32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: U32,
    pub r_bit_mask: U32,
    pub g_bit_mask: U32,
    pub b_bit_mask: U32,
    pub a_bit_mask: U32,
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// DX10 extended header.
    pub const DX10: Self = Self(*b"DX10");
}

/// DX10 extended header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsHeaderDxt10 {
    /// DXGI format.
    pub dxgi_format: U32,
    /// Resource dimension.
    pub resource_dimension: U32,
    /// Misc flags.
    pub misc_flag: U32,
    /// Array size.
    pub array_size: U32,
    /// Misc flags 2.
    pub misc_flags2: U32,
}

impl DdsHeaderDxt10 {
    pub const BC1_UNORM: u32 = 71;
    pub const BC1_UNORM_SRGB: u32 = 72;
    pub const BC3_UNORM: u32 = 77;
    pub const BC3_UNORM_SRGB: u32 = 78;
}

/// Block-compressed formats that can be injected into a BNTX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Bc1Unorm,
    Bc1Srgb,
    Bc3Unorm,
    Bc3Srgb,
}

impl TextureFormat {
    /// Bytes per 4x4 block.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Bc1Unorm | Self::Bc1Srgb => 8,
            Self::Bc3Unorm | Self::Bc3Srgb => 16,
        }
    }

    /// The BNTX surface format code.
    pub const fn bntx_format(self) -> u32 {
        match self {
            Self::Bc1Unorm => 0x1A01,
            Self::Bc1Srgb => 0x1A06,
            Self::Bc3Unorm => 0x1C01,
            Self::Bc3Srgb => 0x1C06,
        }
    }

    pub fn from_bntx_format(code: u32) -> Option<Self> {
        match code {
            0x1A01 => Some(Self::Bc1Unorm),
            0x1A06 => Some(Self::Bc1Srgb),
            0x1C01 => Some(Self::Bc3Unorm),
            0x1C06 => Some(Self::Bc3Srgb),
            _ => None,
        }
    }

    fn from_header(header: &DdsHeader, dx10: Option<&DdsHeaderDxt10>) -> Result<Self> {
        if let Some(dx10) = dx10 {
            return match dx10.dxgi_format.get() {
                DdsHeaderDxt10::BC1_UNORM => Ok(Self::Bc1Unorm),
                DdsHeaderDxt10::BC1_UNORM_SRGB => Ok(Self::Bc1Srgb),
                DdsHeaderDxt10::BC3_UNORM => Ok(Self::Bc3Unorm),
                DdsHeaderDxt10::BC3_UNORM_SRGB => Ok(Self::Bc3Srgb),
                other => Err(Error::UnsupportedFormat(format!("DXGI format {other}"))),
            };
        }

        match header.pixel_format.four_cc {
            FourCC::DXT1 => Ok(Self::Bc1Unorm),
            FourCC::DXT5 => Ok(Self::Bc3Unorm),
            FourCC(code) => Err(Error::UnsupportedFormat(
                String::from_utf8_lossy(&code).into_owned(),
            )),
        }
    }
}

/// Calculate the size in bytes of a mipmap level.
pub fn mipmap_size(width: u32, height: u32, block_size: usize) -> usize {
    let blocks_x = (width as usize).div_ceil(4);
    let blocks_y = (height as usize).div_ceil(4);
    blocks_x.max(1) * blocks_y.max(1) * block_size
}

/// A parsed block-compressed DDS image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dds {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    /// Linear block data of each mipmap, largest first.
    pub mips: Vec<Vec<u8>>,
}

impl Dds {
    /// Parse a DDS file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data, Endian::Little);
        let magic: [u8; 4] = reader.read_array()?;
        if &magic != DDS_MAGIC {
            return Err(Error::InvalidDdsMagic(magic));
        }

        let header: DdsHeader = reader.read_struct()?;
        if header.size.get() != DdsHeader::SIZE {
            return Err(Error::InvalidHeader(format!(
                "header size {}",
                header.size.get()
            )));
        }

        let dx10: Option<DdsHeaderDxt10> = if header.is_dx10() {
            Some(reader.read_struct()?)
        } else {
            None
        };

        let format = TextureFormat::from_header(&header, dx10.as_ref())?;
        let width = header.width.get();
        let height = header.height.get();
        if width == 0 || height == 0 {
            return Err(Error::InvalidHeader(format!("empty image {width}x{height}")));
        }

        // a full chain halves down to 1x1 and no further
        let max_mips = u32::BITS - width.max(height).leading_zeros();
        let mip_count = header.mipmap_count.get().max(1);
        if mip_count > max_mips {
            return Err(Error::InvalidHeader(format!(
                "{mip_count} mipmaps for a {width}x{height} image"
            )));
        }
        let mut mips = Vec::with_capacity(mip_count as usize);
        for level in 0..mip_count {
            let size = mipmap_size(
                (width >> level).max(1),
                (height >> level).max(1),
                format.block_size(),
            );
            if reader.remaining() < size {
                return Err(Error::MipmapSizeMismatch {
                    expected: size,
                    actual: reader.remaining(),
                });
            }
            mips.push(reader.read_bytes(size)?.to_vec());
        }

        trace!(?format, width, height, mips = mips.len(), "parsed DDS");

        Ok(Self {
            format,
            width,
            height,
            mips,
        })
    }

    /// Check if data is a DDS file by checking the magic bytes.
    pub fn is_dds(data: &[u8]) -> bool {
        data.starts_with(DDS_MAGIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_parse_dxt1() {
        let data = fixtures::dds(TextureFormat::Bc1Unorm, 16, 8, 2);
        let dds = Dds::parse(&data).unwrap();
        assert_eq!(dds.format, TextureFormat::Bc1Unorm);
        assert_eq!((dds.width, dds.height), (16, 8));
        assert_eq!(dds.mips.len(), 2);
        assert_eq!(dds.mips[0].len(), 4 * 2 * 8);
        assert_eq!(dds.mips[1].len(), 2 * 1 * 8);
    }

    #[test]
    fn test_parse_dx10_srgb() {
        let data = fixtures::dds(TextureFormat::Bc3Srgb, 8, 8, 1);
        let dds = Dds::parse(&data).unwrap();
        assert_eq!(dds.format, TextureFormat::Bc3Srgb);
        assert_eq!(dds.mips[0].len(), 4 * 16);
    }

    #[test]
    fn test_rejects_truncated() {
        let data = fixtures::dds(TextureFormat::Bc1Unorm, 16, 16, 1);
        assert!(matches!(
            Dds::parse(&data[..data.len() - 1]),
            Err(Error::MipmapSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_unsupported() {
        let mut data = fixtures::dds(TextureFormat::Bc1Unorm, 4, 4, 1);
        // pixel format four-cc
        data[84..88].copy_from_slice(b"ATI2");
        assert!(matches!(Dds::parse(&data), Err(Error::UnsupportedFormat(_))));
        assert!(matches!(
            Dds::parse(b"PNG\0 not a dds file at all"),
            Err(Error::InvalidDdsMagic(_))
        ));
    }

    #[test]
    fn test_rejects_impossible_mip_count() {
        let mut data = fixtures::dds(TextureFormat::Bc1Unorm, 4, 4, 1);
        data[28..32].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(Dds::parse(&data), Err(Error::InvalidHeader(_))));

        let mut data = fixtures::dds(TextureFormat::Bc1Unorm, 1, 1, 1);
        data[28..32].copy_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&[0; 320]);
        assert!(matches!(Dds::parse(&data), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_full_mip_chain() {
        let data = fixtures::dds(TextureFormat::Bc1Unorm, 4, 4, 3);
        assert_eq!(Dds::parse(&data).unwrap().mips.len(), 3);
    }

    #[test]
    fn test_mipmap_size() {
        assert_eq!(mipmap_size(1280, 720, 8), 320 * 180 * 8);
        assert_eq!(mipmap_size(1, 1, 16), 16);
        assert_eq!(mipmap_size(6, 6, 8), 4 * 8);
    }
}
