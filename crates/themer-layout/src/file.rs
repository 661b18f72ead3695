//! BFLYT file container.

use themer_common::{BinaryReader, BinaryWriter, Endian};
use tracing::trace;

use crate::pane::Pane;
use crate::{Error, Result};

/// Magic bytes at the start of a BFLYT file.
pub(crate) const FLYT_MAGIC: &[u8; 4] = b"FLYT";

const HEADER_LEN: u16 = 0x14;
const SECTION_HEADER_LEN: usize = 8;

/// Section magics that start with a pane header.
const PANE_MAGICS: [&[u8; 4]; 8] = [
    b"pan1", b"pic1", b"txt1", b"wnd1", b"bnd1", b"prt1", b"ali1", b"scr1",
];

/// A raw layout section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Four-character section kind (`pan1`, `mat1`, ...).
    pub magic: [u8; 4],
    /// Section body, without the 8-byte section header.
    pub data: Vec<u8>,
}

impl Section {
    pub fn new(magic: &[u8; 4], data: Vec<u8>) -> Self {
        Self {
            magic: *magic,
            data,
        }
    }

    /// Check if the section is of the given kind.
    #[inline]
    pub fn is(&self, magic: &[u8; 4]) -> bool {
        &self.magic == magic
    }

    /// Check if the section starts with a pane header.
    pub fn is_pane(&self) -> bool {
        PANE_MAGICS.iter().any(|m| self.is(m))
    }

    /// The magic as text, for diagnostics.
    pub fn kind(&self) -> String {
        String::from_utf8_lossy(&self.magic).into_owned()
    }
}

/// A parsed BFLYT layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BflytFile {
    endian: Endian,
    version: u32,
    sections: Vec<Section>,
}

impl BflytFile {
    /// Create a layout from sections.
    pub fn new(endian: Endian, version: u32, sections: Vec<Section>) -> Self {
        Self {
            endian,
            version,
            sections,
        }
    }

    /// Check if data is a BFLYT file by checking the magic bytes.
    pub fn is_bflyt(data: &[u8]) -> bool {
        data.starts_with(FLYT_MAGIC)
    }

    /// Parse a BFLYT file from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data, Endian::Little);
        reader.expect_magic(FLYT_MAGIC)?;
        let endian = reader.read_bom()?;
        let header_len = reader.read_u16()? as usize;
        let version = reader.read_u32()?;
        let _file_size = reader.read_u32()?;
        let section_count = reader.read_u16()? as usize;
        reader.seek(header_len);

        let mut sections = Vec::with_capacity(section_count);
        for _ in 0..section_count {
            let offset = reader.position();
            let magic: [u8; 4] = reader.read_array()?;
            let size = reader.read_u32()? as usize;

            if size < SECTION_HEADER_LEN || offset + size > data.len() {
                return Err(Error::InvalidSectionSize {
                    magic: String::from_utf8_lossy(&magic).into_owned(),
                    offset,
                    size,
                });
            }

            let body = reader.read_bytes(size - SECTION_HEADER_LEN)?;
            sections.push(Section {
                magic,
                data: body.to_vec(),
            });
        }

        trace!(sections = sections.len(), %endian, version, "parsed BFLYT");

        Ok(Self {
            endian,
            version,
            sections,
        })
    }

    /// Serialize the layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body: usize = self
            .sections
            .iter()
            .map(|s| s.data.len() + SECTION_HEADER_LEN)
            .sum();
        let file_size = HEADER_LEN as usize + body;

        let mut w = BinaryWriter::with_capacity(self.endian, file_size);
        w.write_bytes(FLYT_MAGIC);
        w.write_bom();
        w.write_u16(HEADER_LEN);
        w.write_u32(self.version);
        w.write_u32(file_size as u32);
        w.write_u16(self.sections.len() as u16);
        w.write_u16(0);

        for section in &self.sections {
            w.write_bytes(&section.magic);
            w.write_u32((section.data.len() + SECTION_HEADER_LEN) as u32);
            w.write_bytes(&section.data);
        }

        w.into_inner()
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[inline]
    pub fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    /// Index of the first section of a kind.
    pub fn find_section(&self, magic: &[u8; 4]) -> Option<usize> {
        self.sections.iter().position(|s| s.is(magic))
    }

    /// Index of the section holding the pane with this name.
    pub fn find_pane(&self, name: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.is_pane() && Pane::read_name(&s.data).is_some_and(|n| n == name))
    }

    /// Names of all panes in draw order.
    pub fn pane_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections
            .iter()
            .filter(|s| s.is_pane())
            .filter_map(|s| Pane::read_name(&s.data))
    }

    /// Read the pane header of a pane section.
    pub fn pane(&self, index: usize) -> Result<Pane> {
        let section = &self.sections[index];
        Pane::read(&section.data, self.endian)
    }

    /// Write a pane header back into a pane section.
    pub fn set_pane(&mut self, index: usize, pane: &Pane) -> Result<()> {
        let endian = self.endian;
        pane.write(&mut self.sections[index].data, endian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_parse_write_roundtrip() {
        for endian in [Endian::Little, Endian::Big] {
            let layout = fixtures::layout(endian, &[(b"pic1", "P_Bg_00"), (b"pan1", "N_Main")]);
            let bytes = layout.to_bytes();
            assert!(BflytFile::is_bflyt(&bytes));

            let parsed = BflytFile::parse(&bytes).unwrap();
            assert_eq!(parsed, layout);
            assert_eq!(parsed.to_bytes(), bytes);
        }
    }

    #[test]
    fn test_unknown_sections_survive() {
        let mut layout = fixtures::layout(Endian::Little, &[]);
        layout
            .sections_mut()
            .push(Section::new(b"usd1", vec![1, 2, 3, 4]));

        let parsed = BflytFile::parse(&layout.to_bytes()).unwrap();
        let last = parsed.sections().last().unwrap();
        assert!(last.is(b"usd1"));
        assert_eq!(last.data, [1, 2, 3, 4]);
    }

    #[test]
    fn test_find_pane() {
        let layout = fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00")]);
        let index = layout.find_pane("P_Bg_00").unwrap();
        assert!(layout.sections()[index].is(b"pic1"));
        assert!(layout.find_pane("missing").is_none());
        assert!(layout.pane_names().any(|n| n == "RootPane"));
    }

    #[test]
    fn test_rejects_bad_section_size() {
        let mut bytes = fixtures::layout(Endian::Little, &[]).to_bytes();
        // first section size field
        bytes[0x18..0x1C].copy_from_slice(&0xFFFFu32.to_le_bytes());
        assert!(matches!(
            BflytFile::parse(&bytes),
            Err(Error::InvalidSectionSize { .. })
        ));
    }
}
