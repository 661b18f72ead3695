//! SARC parsing.

use themer_common::{BinaryReader, Endian};
use tracing::debug;

use crate::format::{
    hash_name, HAS_NAME, SARC_HEADER_LEN, SARC_MAGIC, SFAT_HEADER_LEN, SFAT_MAGIC, SFNT_HEADER_LEN,
    SFNT_MAGIC,
};
use crate::{Error, Result, SarcArchive, SarcFile};

/// One SFAT node.
struct Node {
    hash: u32,
    attributes: u32,
    data_start: usize,
    data_end: usize,
}

impl SarcArchive {
    /// Check whether a buffer starts with the SARC magic.
    pub fn is_sarc(data: &[u8]) -> bool {
        data.starts_with(SARC_MAGIC)
    }

    /// Parse a decompressed SARC archive.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        // The BOM sits after the header length, so peek it before reading
        // anything multi-byte.
        let bom: [u8; 2] = BinaryReader::new_at(data, 6, Endian::Little).read_array()?;
        let endian = Endian::from_bom(bom)?;

        let mut reader = BinaryReader::new(data, endian);
        reader.expect_magic(SARC_MAGIC)?;
        expect_header_len(&mut reader, "SARC", SARC_HEADER_LEN)?;
        reader.advance(2); // BOM
        let _file_size = reader.read_u32()?;
        let data_offset = reader.read_u32()? as usize;
        let _version = reader.read_u16()?;
        reader.advance(2);

        reader.expect_magic(SFAT_MAGIC)?;
        expect_header_len(&mut reader, "SFAT", SFAT_HEADER_LEN)?;
        let node_count = reader.read_u16()? as usize;
        let _hash_key = reader.read_u32()?;

        let mut nodes = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            nodes.push(Node {
                hash: reader.read_u32()?,
                attributes: reader.read_u32()?,
                data_start: reader.read_u32()? as usize,
                data_end: reader.read_u32()? as usize,
            });
        }

        reader.expect_magic(SFNT_MAGIC)?;
        expect_header_len(&mut reader, "SFNT", SFNT_HEADER_LEN)?;
        reader.advance(2);

        let names_start = reader.position();
        let names = data.get(names_start..data_offset.max(names_start)).unwrap_or_default();

        let mut archive = SarcArchive::new(endian);
        for node in &nodes {
            let name = if node.attributes & HAS_NAME != 0 {
                let offset = ((node.attributes & 0xFFFF) as usize) * 4;
                if offset >= names.len() {
                    return Err(Error::NameOutOfRange(offset));
                }
                BinaryReader::new_at(names, offset, endian)
                    .read_cstring()?
                    .to_string()
            } else {
                archive.set_hash_only(true);
                hash_name(node.hash)
            };

            let start = data_offset + node.data_start;
            let end = data_offset + node.data_end;
            if start > end || end > data.len() {
                return Err(Error::DataOutOfRange {
                    name,
                    start,
                    end,
                    size: data.len(),
                });
            }

            if archive.contains(&name) {
                return Err(Error::DuplicateName(name));
            }

            archive.push_unchecked(SarcFile {
                name,
                data: data[start..end].to_vec(),
            });
        }

        debug!(
            files = archive.len(),
            %endian,
            hash_only = archive.is_hash_only(),
            "unpacked SARC"
        );

        Ok(archive)
    }
}

fn expect_header_len(reader: &mut BinaryReader<'_>, section: &'static str, expected: u16) -> Result<()> {
    let actual = reader.read_u16()?;
    if actual != expected {
        return Err(Error::InvalidHeaderLength {
            section,
            expected,
            actual,
        });
    }
    Ok(())
}
