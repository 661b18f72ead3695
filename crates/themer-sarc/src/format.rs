//! SARC on-disk constants and name hashing.

pub(crate) const SARC_MAGIC: &[u8; 4] = b"SARC";
pub(crate) const SFAT_MAGIC: &[u8; 4] = b"SFAT";
pub(crate) const SFNT_MAGIC: &[u8; 4] = b"SFNT";

pub(crate) const SARC_HEADER_LEN: u16 = 0x14;
pub(crate) const SFAT_HEADER_LEN: u16 = 0x0C;
pub(crate) const SFNT_HEADER_LEN: u16 = 0x08;
pub(crate) const NODE_LEN: usize = 0x10;

pub(crate) const VERSION: u16 = 0x0100;

/// Set in a node's attribute when the file has an entry in the name table.
pub(crate) const HAS_NAME: u32 = 0x0100_0000;

/// Multiplier used for file name hashes.
pub const HASH_KEY: u32 = 0x65;

/// Compute the SFAT hash of a file name.
///
/// Bytes are sign-extended before accumulation, matching how the console
/// hashes non-ASCII names.
pub fn name_hash(name: &str, key: u32) -> u32 {
    name.bytes()
        .fold(0u32, |hash, b| hash.wrapping_mul(key).wrapping_add(b as i8 as i32 as u32))
}

/// Name used for an entry whose archive stores only its hash.
pub(crate) fn hash_name(hash: u32) -> String {
    format!("{hash:08X}.bin")
}

/// Recover the hash from a name produced by [`hash_name`].
pub(crate) fn parse_hash_name(name: &str) -> Option<u32> {
    let hex = name.strip_suffix(".bin")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
