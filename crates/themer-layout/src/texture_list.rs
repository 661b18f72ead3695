//! Texture list (`txl1`) section.

use themer_common::{BinaryReader, BinaryWriter, Endian};

use crate::{Error, Result};

/// Texture names referenced by materials, in index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextureList {
    names: Vec<String>,
}

impl TextureList {
    /// Parse a `txl1` section body.
    ///
    /// Name offsets are relative to the start of the offset table, which
    /// follows the 4-byte count header.
    pub fn parse(data: &[u8], endian: Endian) -> Result<Self> {
        let mut reader = BinaryReader::new(data, endian);
        let count = reader.read_u16()? as usize;
        reader.advance(2);

        let base = reader.position();
        let offsets = (0..count)
            .map(|_| reader.read_u32())
            .collect::<themer_common::Result<Vec<u32>>>()?;

        let names = offsets
            .into_iter()
            .map(|offset| {
                let mut r = BinaryReader::new_at(data, base + offset as usize, endian);
                r.read_cstring().map(str::to_string)
            })
            .collect::<themer_common::Result<Vec<String>>>()?;

        Ok(Self { names })
    }

    /// Serialize to a `txl1` section body.
    pub fn to_data(&self, endian: Endian) -> Result<Vec<u8>> {
        let count = u16::try_from(self.names.len()).map_err(|_| Error::TooManyEntries("txl1"))?;

        let mut w = BinaryWriter::new(endian);
        w.write_u16(count);
        w.write_u16(0);

        let mut offset = self.names.len() * 4;
        for name in &self.names {
            w.write_u32(offset as u32);
            offset += name.len() + 1;
        }
        for name in &self.names {
            w.write_cstring(name);
        }
        w.align(4, 0);

        Ok(w.into_inner())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Index of a texture, appending it if it is not listed yet.
    pub fn add(&mut self, name: &str) -> usize {
        match self.index_of(name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        }
    }

    /// Rename a listed texture, keeping its index.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let index = self
            .index_of(from)
            .ok_or_else(|| Error::MissingTexture(from.to_string()))?;
        self.names[index] = to.to_string();
        Ok(())
    }
}

impl FromIterator<String> for TextureList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> TextureList {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_roundtrip() {
        let textures = list(&["White1x1^r", "NavBg_03^d"]);
        for endian in [Endian::Little, Endian::Big] {
            let data = textures.to_data(endian).unwrap();
            assert_eq!(data.len() % 4, 0);
            assert_eq!(TextureList::parse(&data, endian).unwrap(), textures);
        }
    }

    #[test]
    fn test_offsets_are_relative_to_table() {
        let data = list(&["ab", "c"]).to_data(Endian::Little).unwrap();
        // two offsets: 8 (table size) and 8 + 3
        assert_eq!(&data[4..8], &8u32.to_le_bytes());
        assert_eq!(&data[8..12], &11u32.to_le_bytes());
        assert_eq!(&data[12..17], b"ab\0c\0");
    }

    #[test]
    fn test_add_reuses_existing() {
        let mut textures = list(&["a", "b"]);
        assert_eq!(textures.add("b"), 1);
        assert_eq!(textures.add("c"), 2);
        assert_eq!(textures.len(), 3);
    }

    #[test]
    fn test_rename() {
        let mut textures = list(&["White1x1A64^t", "x"]);
        textures.rename("White1x1A64^t", "White1x1A128^s").unwrap();
        assert_eq!(textures.index_of("White1x1A128^s"), Some(0));
        assert!(matches!(
            textures.rename("missing", "y"),
            Err(Error::MissingTexture(_))
        ));
    }
}
