//! Theme pack validation.

use themer_sarc::SarcArchive;

use crate::{szs, Error, Result};

/// Entry holding the replacement background texture.
pub const IMAGE_ENTRY: &str = "image.dds";

/// Optional entry holding a custom layout patch.
pub const LAYOUT_ENTRY: &str = "layout.json";

/// The payloads of a validated theme pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePack {
    image: Vec<u8>,
    layout: Option<Vec<u8>>,
}

impl ThemePack {
    /// Decompress and unpack a theme pack, then validate it.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let archive = szs::open(data).map_err(|e| Error::InvalidThemePack(e.to_string()))?;
        Self::from_archive(archive)
    }

    /// Take the payloads out of an unpacked theme pack.
    ///
    /// Fails unless the pack has an `image.dds` entry.
    pub fn from_archive(mut archive: SarcArchive) -> Result<Self> {
        let image = archive
            .remove(IMAGE_ENTRY)
            .ok_or_else(|| Error::InvalidThemePack(format!("missing {IMAGE_ENTRY}")))?;
        let layout = archive.remove(LAYOUT_ENTRY);
        Ok(Self { image, layout })
    }

    /// Raw DDS bytes.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Raw layout patch JSON, if the pack has one.
    pub fn layout(&self) -> Option<&[u8]> {
        self.layout.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use themer_common::Endian;

    #[test]
    fn test_requires_image() {
        let mut archive = SarcArchive::new(Endian::Little);
        archive.insert(LAYOUT_ENTRY, b"{}".to_vec());
        let err = ThemePack::from_archive(archive).unwrap_err();
        assert!(matches!(err, Error::InvalidThemePack(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_extracts_payloads() {
        let mut archive = SarcArchive::new(Endian::Little);
        archive.insert(IMAGE_ENTRY, b"DDS data".to_vec());
        let theme = ThemePack::from_archive(archive.clone()).unwrap();
        assert_eq!(theme.image(), b"DDS data");
        assert_eq!(theme.layout(), None);

        archive.insert(LAYOUT_ENTRY, b"{}".to_vec());
        let theme = ThemePack::from_archive(archive).unwrap();
        assert_eq!(theme.layout(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_rejects_undecodable_pack() {
        assert!(matches!(
            ThemePack::from_bytes(b"Yaz0 but truncated"),
            Err(Error::InvalidThemePack(_))
        ));
    }
}
