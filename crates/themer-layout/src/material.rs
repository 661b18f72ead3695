//! Material list (`mat1`) section.
//!
//! Materials are variable-length blobs. Only the fields needed to add a
//! textured material and to read texture references are decoded; every
//! other byte is carried verbatim.

use themer_common::{BinaryReader, BinaryWriter, Endian};

use crate::{Error, Result};

const NAME_LEN: usize = 0x1C;
const FLAGS_OFFSET: usize = NAME_LEN + 8;
const TEXTURE_MAPS_OFFSET: usize = FLAGS_OFFSET + 4;

/// Offsets in `mat1` are relative to the section start, header included.
const SECTION_HEADER_LEN: usize = 8;

/// A single material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Raw material bytes, starting with the name field.
    pub data: Vec<u8>,
}

impl Material {
    /// Create a material that draws one texture unmodified.
    ///
    /// One texture map, one texture transform and one coordinate generator.
    pub fn textured(name: &str, texture_index: u16, endian: Endian) -> Self {
        let mut w = BinaryWriter::with_capacity(endian, 0x50);
        w.write_fixed_string(name, NAME_LEN);
        w.write_bytes(&[0, 0, 0, 0]); // black color
        w.write_bytes(&[0xFF; 4]); // white color
        w.write_u32(0x15);

        // texture map: index, wrap S, wrap T
        w.write_u16(texture_index);
        w.write_u8(0);
        w.write_u8(0);

        // identity texture transform
        for v in [0.0, 0.0, 0.0, 1.0, 1.0] {
            w.write_f32(v);
        }

        // coordinate generator: 2x4 matrix from UV set 0
        w.write_u8(1);
        w.write_u8(1);
        w.write_bytes(&[0; 14]);

        Self {
            data: w.into_inner(),
        }
    }

    pub fn name(&self) -> &str {
        let field = &self.data[..NAME_LEN.min(self.data.len())];
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        std::str::from_utf8(&field[..end]).unwrap_or_default()
    }

    /// Texture list indices referenced by the material's texture maps.
    pub fn texture_maps(&self, endian: Endian) -> Result<Vec<u16>> {
        let mut reader = BinaryReader::new_at(&self.data, FLAGS_OFFSET, endian);
        let count = (reader.read_u32()? & 3) as usize;

        reader.seek(TEXTURE_MAPS_OFFSET);
        let mut maps = Vec::with_capacity(count);
        for _ in 0..count {
            maps.push(reader.read_u16()?);
            reader.advance(2);
        }
        Ok(maps)
    }
}

/// All materials of a layout, in index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterialList {
    materials: Vec<Material>,
}

impl MaterialList {
    /// Parse a `mat1` section body.
    pub fn parse(data: &[u8], endian: Endian) -> Result<Self> {
        let mut reader = BinaryReader::new(data, endian);
        let count = reader.read_u16()? as usize;
        reader.advance(2);

        let mut starts = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = reader.read_u32()? as usize;
            starts.push(offset.saturating_sub(SECTION_HEADER_LEN));
        }

        let mut materials = Vec::with_capacity(count);
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(data.len());
            let mut r = BinaryReader::new_at(data, start, endian);
            let bytes = r.read_bytes(end.saturating_sub(start))?;
            materials.push(Material {
                data: bytes.to_vec(),
            });
        }

        Ok(Self { materials })
    }

    /// Serialize to a `mat1` section body.
    pub fn to_data(&self, endian: Endian) -> Result<Vec<u8>> {
        let count =
            u16::try_from(self.materials.len()).map_err(|_| Error::TooManyEntries("mat1"))?;

        let mut w = BinaryWriter::new(endian);
        w.write_u16(count);
        w.write_u16(0);

        let mut offset = SECTION_HEADER_LEN + 4 + self.materials.len() * 4;
        for material in &self.materials {
            w.write_u32(offset as u32);
            offset += material.data.len();
        }
        for material in &self.materials {
            w.write_bytes(&material.data);
        }

        Ok(w.into_inner())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> + '_ {
        self.materials.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name() == name)
    }

    /// Append a material and return its index.
    pub fn push(&mut self, material: Material) -> Result<u16> {
        let index =
            u16::try_from(self.materials.len()).map_err(|_| Error::TooManyEntries("mat1"))?;
        self.materials.push(material);
        Ok(index)
    }
}
