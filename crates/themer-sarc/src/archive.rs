//! In-memory SARC archive model.

use themer_common::Endian;

/// A named file inside a [`SarcArchive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SarcFile {
    /// Path of the file inside the archive.
    pub name: String,
    /// File contents.
    pub data: Vec<u8>,
}

/// An unpacked SARC archive.
///
/// Files keep the order they were unpacked or inserted in, and packing
/// writes them back in that order so untouched entries round-trip unchanged.
/// Names are unique: inserting an existing name replaces its contents in
/// place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SarcArchive {
    endian: Endian,
    hash_only: bool,
    files: Vec<SarcFile>,
}

impl SarcArchive {
    /// Create an empty archive.
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            hash_only: false,
            files: Vec::new(),
        }
    }

    /// Byte order the archive is stored in.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Whether the archive stores only name hashes (no name table).
    #[inline]
    pub fn is_hash_only(&self) -> bool {
        self.hash_only
    }

    /// Mark the archive as hash-only.
    pub fn set_hash_only(&mut self, hash_only: bool) {
        self.hash_only = hash_only;
    }

    /// Number of files.
    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check whether a file exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Get a file's contents by name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.position(name).map(|i| self.files[i].data.as_slice())
    }

    /// Get mutable access to a file's contents.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<u8>> {
        self.position(name).map(move |i| &mut self.files[i].data)
    }

    /// Insert or replace a file.
    ///
    /// Replacing keeps the file's position; a new file is appended. Returns
    /// the previous contents when a file was replaced.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) -> Option<Vec<u8>> {
        let name = name.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.files[i].data, data)),
            None => {
                self.files.push(SarcFile { name, data });
                None
            }
        }
    }

    /// Remove a file, returning its contents.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.position(name).map(|i| self.files.remove(i).data)
    }

    /// Iterate over files in archive order.
    pub fn iter(&self) -> impl Iterator<Item = &SarcFile> + '_ {
        self.files.iter()
    }

    /// Iterate over file names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub(crate) fn push_unchecked(&mut self, file: SarcFile) {
        self.files.push(file);
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name == name)
    }
}
