//! BNTX texture containers.
//!
//! A BNTX holds texture descriptors (`BRTI`) pointing into one shared data
//! block (`BRTD`), followed by a relocation table (`_RLT`). Replacing a
//! texture splices its region of the data block and shifts every offset that
//! points past it; the rest of the file is kept byte for byte.

use themer_common::{align_up, BinaryReader, Endian};
use tracing::debug;

use crate::swizzle::{block_height, mip_block_height, swizzle_block_linear};
use crate::{Dds, Error, Result, TextureFormat};

const BNTX_MAGIC: &[u8; 4] = b"BNTX";
const NX_MAGIC: &[u8; 4] = b"NX  ";
const BRTI_MAGIC: &[u8; 4] = b"BRTI";
const BRTD_MAGIC: &[u8; 4] = b"BRTD";
const RLT_MAGIC: &[u8; 4] = b"_RLT";

// file header
const BOM_OFFSET: usize = 0x0C;
const RELOC_TABLE_OFFSET: usize = 0x18;
const FILE_SIZE_OFFSET: usize = 0x1C;
const NX_OFFSET: usize = 0x20;

// BRTD block
const BRTD_NEXT_BLOCK: usize = 0x04;
const BRTD_SIZE: usize = 0x08;
const BRTD_HEADER_LEN: usize = 0x10;

// BRTI fields
const MIP_COUNT: usize = 0x16;
const FORMAT: usize = 0x1C;
const WIDTH: usize = 0x24;
const HEIGHT: usize = 0x28;
const TEXTURE_LAYOUT: usize = 0x34;
const IMAGE_SIZE: usize = 0x50;
const ALIGNMENT: usize = 0x54;
const NAME: usize = 0x60;
const MIP_OFFSETS: usize = 0x70;

// relocation table
const RLT_HEADER_LEN: usize = 0x10;
const RLT_SECTION_LEN: usize = 0x18;
const RLT_ENTRY_LEN: usize = 0x08;

/// Texture data alignment when a descriptor declares none.
const DEFAULT_ALIGNMENT: usize = 0x200;

/// A texture descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub name: String,
    /// BNTX surface format code.
    pub format: u32,
    pub width: u32,
    pub height: u32,
    pub block_height_log2: u32,
    pub image_size: u32,
    pub alignment: u32,
    /// Absolute file offset of each mipmap.
    pub mip_offsets: Vec<u64>,
    info_offset: usize,
    mip_offsets_ptr: usize,
}

impl TextureInfo {
    fn read(data: &[u8], offset: usize, endian: Endian) -> Result<Self> {
        let mut r = BinaryReader::new_at(data, offset, endian);
        r.expect_magic(BRTI_MAGIC)?;

        r.seek(offset + MIP_COUNT);
        let mip_count = r.read_u16()? as usize;
        r.seek(offset + FORMAT);
        let format = r.read_u32()?;
        r.seek(offset + WIDTH);
        let width = r.read_u32()?;
        let height = r.read_u32()?;
        r.seek(offset + TEXTURE_LAYOUT);
        let block_height_log2 = r.read_u32()?;
        r.seek(offset + IMAGE_SIZE);
        let image_size = r.read_u32()?;
        let alignment = r.read_u32()?;
        r.seek(offset + NAME);
        let name_offset = r.read_u64()? as usize;
        r.seek(offset + MIP_OFFSETS);
        let mip_offsets_ptr = r.read_u64()? as usize;

        // names are stored with a 16-bit length prefix
        let mut names = BinaryReader::new_at(data, name_offset, endian);
        let len = names.read_u16()? as usize;
        let name = std::str::from_utf8(names.read_bytes(len)?)
            .map_err(themer_common::Error::Utf8)?
            .to_string();

        if mip_count == 0 {
            return Err(Error::InvalidBntx(format!("texture {name} has no mipmaps")));
        }

        let mut mips = BinaryReader::new_at(data, mip_offsets_ptr, endian);
        let mip_offsets = (0..mip_count)
            .map(|_| mips.read_u64())
            .collect::<themer_common::Result<Vec<u64>>>()?;

        Ok(Self {
            name,
            format,
            width,
            height,
            block_height_log2,
            image_size,
            alignment,
            mip_offsets,
            info_offset: offset,
            mip_offsets_ptr,
        })
    }

    pub fn texture_format(&self) -> Option<TextureFormat> {
        TextureFormat::from_bntx_format(self.format)
    }

    pub fn mip_count(&self) -> usize {
        self.mip_offsets.len()
    }

    /// Absolute file offset of the base mipmap.
    pub fn data_offset(&self) -> usize {
        self.mip_offsets[0] as usize
    }
}

/// A BNTX texture container.
#[derive(Debug, Clone)]
pub struct Bntx {
    data: Vec<u8>,
    endian: Endian,
    data_block: usize,
    textures: Vec<TextureInfo>,
}

impl Bntx {
    /// Check if data is a BNTX file by checking the magic bytes.
    pub fn is_bntx(data: &[u8]) -> bool {
        data.starts_with(BNTX_MAGIC)
    }

    /// Parse a BNTX container.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::from_vec(data.to_vec())
    }

    fn from_vec(data: Vec<u8>) -> Result<Self> {
        let mut r = BinaryReader::new(&data, Endian::Little);
        r.expect_magic(BNTX_MAGIC)?;
        r.seek(BOM_OFFSET);
        let endian = r.read_bom()?;

        r.seek(NX_OFFSET);
        r.expect_magic(NX_MAGIC)?;
        let count = r.read_u32()? as usize;
        let info_array = r.read_u64()? as usize;
        let data_block = r.read_u64()? as usize;

        BinaryReader::new_at(&data, data_block, endian).expect_magic(BRTD_MAGIC)?;

        // the descriptor pointer array sits before the data block
        let capacity = data_block.saturating_sub(info_array) / 8;
        if count > capacity {
            return Err(Error::InvalidBntx(format!(
                "{count} textures do not fit before the data block"
            )));
        }

        let mut infos = BinaryReader::new_at(&data, info_array, endian);
        let mut textures = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = infos.read_u64()? as usize;
            let texture = TextureInfo::read(&data, offset, endian)?;

            // descriptors must not move when the data block is resized
            if offset >= data_block || texture.mip_offsets_ptr >= data_block {
                return Err(Error::InvalidBntx(format!(
                    "descriptor of {} follows the data block",
                    texture.name
                )));
            }
            textures.push(texture);
        }

        debug!(textures = textures.len(), %endian, size = data.len(), "parsed BNTX");

        Ok(Self {
            data,
            endian,
            data_block,
            textures,
        })
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn textures(&self) -> &[TextureInfo] {
        &self.textures
    }

    pub fn texture(&self, name: &str) -> Option<&TextureInfo> {
        self.textures.iter().find(|t| t.name == name)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(BinaryReader::new_at(&self.data, offset, self.endian).read_u32()?)
    }

    fn read_u64(&self, offset: usize) -> Result<u64> {
        Ok(BinaryReader::new_at(&self.data, offset, self.endian).read_u64()?)
    }

    /// Replace a texture's image with a DDS.
    ///
    /// The image is swizzled into block-linear layout and the descriptor's
    /// format, size, block height and mipmap offsets are rewritten. Mipmaps
    /// beyond the descriptor's existing count are dropped, since the offset
    /// array cannot grow in place.
    pub fn replace_texture(&mut self, name: &str, dds: &Dds) -> Result<()> {
        let texture = self
            .texture(name)
            .cloned()
            .ok_or_else(|| Error::TextureNotFound(name.to_string()))?;

        let bpe = dds.format.block_size();
        let base_block_height = block_height((dds.height as usize).div_ceil(4));
        let mip_count = dds.mips.len().min(texture.mip_count());

        let mut image = Vec::new();
        let mut mip_starts = Vec::with_capacity(mip_count);
        for (level, mip) in dds.mips.iter().take(mip_count).enumerate() {
            let width = ((dds.width >> level).max(1) as usize).div_ceil(4);
            let height = ((dds.height >> level).max(1) as usize).div_ceil(4);
            let block_height = mip_block_height(height, base_block_height);

            mip_starts.push(image.len());
            image.extend(swizzle_block_linear(mip, width, height, bpe, block_height));
        }
        let image_size = image.len();

        let start = texture.data_offset();
        let data_end = self.data_block + self.read_u64(self.data_block + BRTD_SIZE)? as usize;
        if start < self.data_block + BRTD_HEADER_LEN || start > data_end || data_end > self.data.len()
        {
            return Err(Error::InvalidBntx(format!(
                "texture {name} data at {start:#x} is outside the data block"
            )));
        }

        let next = self
            .textures
            .iter()
            .map(TextureInfo::data_offset)
            .filter(|&offset| offset > start)
            .min();
        let end = next.unwrap_or(data_end);
        let alignment = match texture.alignment as usize {
            0 => DEFAULT_ALIGNMENT,
            a => a,
        };
        let region = if next.is_some() {
            align_up(image_size, alignment)
        } else {
            align_up(image_size, 8)
        };
        image.resize(region, 0);

        let delta = region as i64 - (end - start) as i64;
        self.data.splice(start..end, image);

        let endian = self.endian;
        let boundary = end as u64;
        let shift = |pos: u64| {
            if pos >= boundary {
                pos.wrapping_add_signed(delta)
            } else {
                pos
            }
        };

        // offsets into the data block
        for other in self.textures.iter().filter(|t| t.name != name) {
            for (m, &offset) in other.mip_offsets.iter().enumerate() {
                put_u64(&mut self.data, endian, other.mip_offsets_ptr + m * 8, shift(offset))?;
            }
        }
        for m in 0..texture.mip_count() {
            let offset = mip_starts.get(m).map_or(0, |&s| (start + s) as u64);
            put_u64(&mut self.data, endian, texture.mip_offsets_ptr + m * 8, offset)?;
        }

        // the replaced descriptor
        let info = texture.info_offset;
        put_u16(&mut self.data, endian, info + MIP_COUNT, mip_count as u16)?;
        put_u32(&mut self.data, endian, info + FORMAT, dds.format.bntx_format())?;
        put_u32(&mut self.data, endian, info + WIDTH, dds.width)?;
        put_u32(&mut self.data, endian, info + HEIGHT, dds.height)?;
        put_u32(
            &mut self.data,
            endian,
            info + TEXTURE_LAYOUT,
            base_block_height.trailing_zeros(),
        )?;
        put_u32(&mut self.data, endian, info + IMAGE_SIZE, image_size as u32)?;

        // data block header
        let brtd_size = self.read_u64(self.data_block + BRTD_SIZE)?;
        put_u64(
            &mut self.data,
            endian,
            self.data_block + BRTD_SIZE,
            brtd_size.wrapping_add_signed(delta),
        )?;
        let next_block = self.read_u32(self.data_block + BRTD_NEXT_BLOCK)?;
        if next_block != 0 {
            let target = shift((self.data_block + next_block as usize) as u64);
            put_u32(
                &mut self.data,
                endian,
                self.data_block + BRTD_NEXT_BLOCK,
                (target as usize - self.data_block) as u32,
            )?;
        }

        // relocation table and file size
        let rlt = self.read_u32(RELOC_TABLE_OFFSET)? as u64;
        if rlt != 0 {
            let rlt = shift(rlt) as usize;
            put_u32(&mut self.data, endian, RELOC_TABLE_OFFSET, rlt as u32)?;
            self.shift_relocations(rlt, start as u32, end as u32, delta)?;
        }
        let file_size = self.data.len() as u32;
        put_u32(&mut self.data, endian, FILE_SIZE_OFFSET, file_size)?;

        debug!(
            texture = name,
            format = ?dds.format,
            width = dds.width,
            height = dds.height,
            mips = mip_count,
            delta,
            "replaced texture"
        );

        let data = std::mem::take(&mut self.data);
        *self = Self::from_vec(data)?;
        Ok(())
    }

    /// Shift relocation sections and entries after a data splice of
    /// `start..end` by `delta` bytes.
    fn shift_relocations(&mut self, rlt: usize, start: u32, end: u32, delta: i64) -> Result<()> {
        BinaryReader::new_at(&self.data, rlt, self.endian).expect_magic(RLT_MAGIC)?;
        let endian = self.endian;
        let delta = delta as i32;

        put_u32(&mut self.data, endian, rlt + 4, rlt as u32)?;
        let section_count = self.read_u32(rlt + 8)? as usize;

        let mut entry_count = 0usize;
        for s in 0..section_count {
            let section = rlt + RLT_HEADER_LEN + s * RLT_SECTION_LEN;
            let position = self.read_u32(section + 8)?;
            let size = self.read_u32(section + 12)?;
            entry_count += self.read_u32(section + 20)? as usize;

            if position >= end {
                put_u32(&mut self.data, endian, section + 8, position.wrapping_add_signed(delta))?;
            } else if position <= start && position + size >= end {
                put_u32(&mut self.data, endian, section + 12, size.wrapping_add_signed(delta))?;
            }
        }

        let entries = rlt + RLT_HEADER_LEN + section_count * RLT_SECTION_LEN;
        for e in 0..entry_count {
            let entry = entries + e * RLT_ENTRY_LEN;
            let position = self.read_u32(entry)?;
            if position >= end {
                put_u32(&mut self.data, endian, entry, position.wrapping_add_signed(delta))?;
            }
        }
        Ok(())
    }
}

fn field(data: &mut [u8], offset: usize, len: usize) -> Result<&mut [u8]> {
    let size = data.len();
    data.get_mut(offset..offset + len).ok_or_else(|| {
        themer_common::Error::WriteOutOfBounds { offset, len, size }.into()
    })
}

fn put_u16(data: &mut [u8], endian: Endian, offset: usize, value: u16) -> Result<()> {
    endian.write_u16(field(data, offset, 2)?, value);
    Ok(())
}

fn put_u32(data: &mut [u8], endian: Endian, offset: usize, value: u32) -> Result<()> {
    endian.write_u32(field(data, offset, 4)?, value);
    Ok(())
}

fn put_u64(data: &mut [u8], endian: Endian, offset: usize, value: u64) -> Result<()> {
    endian.write_u64(field(data, offset, 8)?, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::swizzle::swizzled_size;

    fn u32_at(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_parse() {
        let data = fixtures::bntx(Endian::Little, &[("White1x1A128^s", 16, 16), ("Other", 32, 8)]);
        let bntx = Bntx::parse(&data).unwrap();

        assert_eq!(bntx.textures().len(), 2);
        let texture = bntx.texture("Other").unwrap();
        assert_eq!((texture.width, texture.height), (32, 8));
        assert_eq!(texture.texture_format(), Some(TextureFormat::Bc1Unorm));
        assert_eq!(texture.data_offset() % 0x200, 0);
        assert!(bntx.texture("missing").is_none());
    }

    #[test]
    fn test_replace_grows_and_shifts() {
        let data = fixtures::bntx(Endian::Little, &[("Bg", 16, 16), ("Other", 16, 16)]);
        let before = Bntx::parse(&data).unwrap();
        let other_offset = before.texture("Other").unwrap().data_offset();
        let rlt = u32_at(&data, RELOC_TABLE_OFFSET) as usize;

        let dds = Dds::parse(&fixtures::dds(TextureFormat::Bc1Srgb, 64, 64, 1)).unwrap();
        let mut bntx = before.clone();
        bntx.replace_texture("Bg", &dds).unwrap();

        // 16x16 BC1 fills one GOB; 64x64 needs four
        let delta = swizzled_size(16, 16, 8, 2) - swizzled_size(4, 4, 8, 1);
        assert_eq!(delta, 1536);

        let bg = bntx.texture("Bg").unwrap();
        assert_eq!((bg.width, bg.height), (64, 64));
        assert_eq!(bg.texture_format(), Some(TextureFormat::Bc1Srgb));
        assert_eq!(bg.image_size, 2048);
        assert_eq!(bg.block_height_log2, 1);

        let other = bntx.texture("Other").unwrap();
        assert_eq!(other.data_offset(), other_offset + delta);
        assert!(bntx.as_bytes()[other.data_offset()..other.data_offset() + 512]
            .iter()
            .all(|&b| b == 2));

        let out = bntx.into_bytes();
        assert_eq!(u32_at(&out, FILE_SIZE_OFFSET) as usize, out.len());
        assert_eq!(u32_at(&out, RELOC_TABLE_OFFSET) as usize, rlt + delta);
        assert_eq!(&out[rlt + delta..rlt + delta + 4], RLT_MAGIC);
        assert_eq!(out.len(), data.len() + delta);
    }

    #[test]
    fn test_replaced_data_is_swizzled() {
        let data = fixtures::bntx(Endian::Little, &[("Bg", 16, 16)]);
        let dds = Dds::parse(&fixtures::dds(TextureFormat::Bc1Unorm, 32, 32, 1)).unwrap();

        let mut bntx = Bntx::parse(&data).unwrap();
        bntx.replace_texture("Bg", &dds).unwrap();

        let bg = bntx.texture("Bg").unwrap().clone();
        let expected = swizzle_block_linear(&dds.mips[0], 8, 8, 8, 1);
        let start = bg.data_offset();
        assert_eq!(&bntx.as_bytes()[start..start + expected.len()], &expected[..]);
    }

    #[test]
    fn test_relocation_sections_follow_splice() {
        let data = fixtures::bntx(Endian::Big, &[("A", 16, 16), ("B", 8, 8)]);
        let dds = Dds::parse(&fixtures::dds(TextureFormat::Bc3Unorm, 64, 32, 1)).unwrap();

        let mut bntx = Bntx::parse(&data).unwrap();
        bntx.replace_texture("B", &dds).unwrap();
        let endian = bntx.endian();
        let out = bntx.into_bytes();

        let rlt = endian.read_u32(&out[RELOC_TABLE_OFFSET..]) as usize;
        assert_eq!(&out[rlt..rlt + 4], RLT_MAGIC);
        assert_eq!(endian.read_u32(&out[rlt + 4..]) as usize, rlt);

        // section 1 covers the data block up to the table
        let section = rlt + RLT_HEADER_LEN + RLT_SECTION_LEN;
        let position = endian.read_u32(&out[section + 8..]) as usize;
        let size = endian.read_u32(&out[section + 12..]) as usize;
        assert_eq!(&out[position..position + 4], BRTD_MAGIC);
        assert_eq!(
            endian.read_u64(&out[position + BRTD_SIZE..]) as usize,
            size
        );

        let reparsed = Bntx::parse(&out).unwrap();
        let b = reparsed.texture("B").unwrap();
        assert_eq!(b.format, 0x1C01);
        assert!(b.data_offset() + b.image_size as usize <= position + size);
    }

    #[test]
    fn test_extra_mipmaps_are_dropped() {
        let data = fixtures::bntx(Endian::Little, &[("Bg", 16, 16)]);
        let dds = Dds::parse(&fixtures::dds(TextureFormat::Bc1Unorm, 64, 64, 3)).unwrap();

        let mut bntx = Bntx::parse(&data).unwrap();
        bntx.replace_texture("Bg", &dds).unwrap();
        assert_eq!(bntx.texture("Bg").unwrap().mip_count(), 1);
    }

    #[test]
    fn test_missing_texture() {
        let data = fixtures::bntx(Endian::Little, &[("Bg", 16, 16)]);
        let dds = Dds::parse(&fixtures::dds(TextureFormat::Bc1Unorm, 4, 4, 1)).unwrap();
        let mut bntx = Bntx::parse(&data).unwrap();
        assert!(matches!(
            bntx.replace_texture("White1x1^s", &dds),
            Err(Error::TextureNotFound(_))
        ));
        assert_eq!(bntx.as_bytes(), &data[..]);
    }

    #[test]
    fn test_rejects_impossible_texture_count() {
        let mut data = fixtures::bntx(Endian::Little, &[("Bg", 16, 16)]);
        data[0x24..0x28].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(Bntx::parse(&data), Err(Error::InvalidBntx(_))));
    }

    #[test]
    fn test_rejects_other_files() {
        assert!(!Bntx::is_bntx(b"FLYT"));
        assert!(Bntx::parse(b"FLYT\0\0\0\0").is_err());
    }
}
