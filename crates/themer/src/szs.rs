//! SZS (Yaz0-compressed SARC) handling.

use std::borrow::Cow;

use themer_sarc::{PackedSarc, SarcArchive};

use crate::ArchiveError;

/// Decompress a Yaz0 stream, passing other data through unchanged.
pub fn decompress(data: &[u8]) -> Result<Cow<'_, [u8]>, themer_yaz0::Error> {
    if themer_yaz0::is_yaz0(data) {
        Ok(Cow::Owned(themer_yaz0::decompress(data)?))
    } else {
        Ok(Cow::Borrowed(data))
    }
}

/// Decompress if needed and unpack an archive.
pub fn open(data: &[u8]) -> Result<SarcArchive, ArchiveError> {
    let raw = decompress(data)?;
    Ok(SarcArchive::unpack(&raw)?)
}

/// Compress a packed archive, recording its alignment in the Yaz0 header.
pub fn compress(packed: &PackedSarc, level: u8) -> Vec<u8> {
    themer_yaz0::compress(&packed.data, level, packed.alignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use themer_common::Endian;

    fn archive() -> SarcArchive {
        let mut archive = SarcArchive::new(Endian::Little);
        archive.insert("blyt/BgNml.bflyt", b"FLYT".repeat(16));
        archive.insert("timg/__Combined.bntx", b"BNTX".repeat(8));
        archive
    }

    #[test]
    fn test_open_compressed_and_raw() {
        let packed = archive().pack().unwrap();
        let compressed = compress(&packed, 3);
        assert!(themer_yaz0::is_yaz0(&compressed));

        assert_eq!(open(&compressed).unwrap(), archive());
        assert_eq!(open(&packed.data).unwrap(), archive());
    }

    #[test]
    fn test_alignment_is_recorded() {
        let packed = archive().pack().unwrap();
        let header = themer_yaz0::Header::parse(&compress(&packed, 0)).unwrap();
        assert_eq!(header.alignment.get(), packed.alignment);
        assert_eq!(header.decompressed_size.get() as usize, packed.data.len());
    }

    #[test]
    fn test_raw_passthrough_borrows() {
        assert!(matches!(decompress(b"SARC"), Ok(Cow::Borrowed(_))));
        assert!(matches!(open(b"garbage"), Err(ArchiveError::Sarc(_))));
    }
}
