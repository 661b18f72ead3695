//! SARC serialization.

use themer_common::{align_up, BinaryWriter};
use tracing::debug;

use crate::format::{
    name_hash, parse_hash_name, HASH_KEY, HAS_NAME, NODE_LEN, SARC_HEADER_LEN, SARC_MAGIC,
    SFAT_HEADER_LEN, SFAT_MAGIC, SFNT_HEADER_LEN, SFNT_MAGIC, VERSION,
};
use crate::{guess_alignment, Error, Result, SarcArchive};

/// A packed SARC archive.
#[derive(Debug, Clone)]
pub struct PackedSarc {
    /// Serialized archive.
    pub data: Vec<u8>,
    /// Largest alignment any payload required; the loader must map the
    /// archive at a multiple of this.
    pub alignment: u32,
}

impl SarcArchive {
    /// Serialize the archive.
    ///
    /// Files are written in archive order, each payload aligned to the
    /// boundary its format needs.
    pub fn pack(&self) -> Result<PackedSarc> {
        let endian = self.endian();

        let hashes = self
            .iter()
            .map(|f| {
                if self.is_hash_only() {
                    parse_hash_name(&f.name).ok_or_else(|| Error::InvalidHashName(f.name.clone()))
                } else {
                    Ok(name_hash(&f.name, HASH_KEY))
                }
            })
            .collect::<Result<Vec<u32>>>()?;

        let alignments: Vec<usize> = self.iter().map(|f| guess_alignment(&f.data)).collect();
        let max_alignment = alignments.iter().copied().max().unwrap_or(4).max(4);

        let mut w = BinaryWriter::with_capacity(endian, self.iter().map(|f| f.data.len() + 0x20).sum());

        // SARC header; file size and data offset are patched at the end
        w.write_bytes(SARC_MAGIC);
        w.write_u16(SARC_HEADER_LEN);
        w.write_bom();
        w.write_u32(0);
        w.write_u32(0);
        w.write_u16(VERSION);
        w.write_u16(0);

        // SFAT
        w.write_bytes(SFAT_MAGIC);
        w.write_u16(SFAT_HEADER_LEN);
        w.write_u16(self.len() as u16);
        w.write_u32(HASH_KEY);

        let node_table = w.position();
        let mut name_offset = 0usize;
        for (file, hash) in self.iter().zip(&hashes) {
            w.write_u32(*hash);
            if self.is_hash_only() {
                w.write_u32(0);
            } else {
                w.write_u32(HAS_NAME | (name_offset / 4) as u32);
                name_offset += align_up(file.name.len() + 1, 4);
            }
            // data range, patched once payloads are placed
            w.write_u32(0);
            w.write_u32(0);
        }

        // SFNT
        w.write_bytes(SFNT_MAGIC);
        w.write_u16(SFNT_HEADER_LEN);
        w.write_u16(0);
        if !self.is_hash_only() {
            for file in self.iter() {
                w.write_cstring(&file.name);
                w.align(4, 0);
            }
        }

        w.align(max_alignment, 0);
        let data_offset = w.position();

        for (i, (file, alignment)) in self.iter().zip(&alignments).enumerate() {
            w.align(*alignment, 0);
            let start = w.position() - data_offset;
            w.write_bytes(&file.data);
            let end = w.position() - data_offset;

            let node = node_table + i * NODE_LEN;
            w.write_u32_at(node + 8, start as u32)?;
            w.write_u32_at(node + 12, end as u32)?;
        }

        let file_size = w.position();
        w.write_u32_at(0x08, file_size as u32)?;
        w.write_u32_at(0x0C, data_offset as u32)?;

        debug!(
            files = self.len(),
            size = file_size,
            alignment = max_alignment,
            "packed SARC"
        );

        Ok(PackedSarc {
            data: w.into_inner(),
            alignment: max_alignment as u32,
        })
    }
}
