//! Fixed-width record keys
//!
//! Every record carries a 64-byte key field. Names shorter than 64 bytes
//! are NUL-padded; names of 64 bytes or more fill the field completely and
//! have no terminator. Keys are compared over all 64 bytes.

use std::fmt;

/// Width of the key field in bytes
pub const KEY_MAX: usize = 64;

/// A record key as stored in the record header
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey([u8; KEY_MAX]);

impl RecordKey {
    /// Build a key from a name.
    ///
    /// Copies bytes up to the first NUL or [`KEY_MAX`] bytes, whichever
    /// comes first, and zero-fills the rest. Longer names are truncated.
    pub fn new(name: &[u8]) -> Self {
        let mut key = [0u8; KEY_MAX];
        for (dst, &src) in key.iter_mut().zip(name.iter()) {
            if src == 0 {
                break;
            }
            *dst = src;
        }
        RecordKey(key)
    }

    /// Wrap a raw key field as read from a record header
    pub fn from_raw(raw: [u8; KEY_MAX]) -> Self {
        RecordKey(raw)
    }

    /// All 64 bytes of the key field
    pub fn as_bytes(&self) -> &[u8; KEY_MAX] {
        &self.0
    }

    /// The name part of the key (up to the first NUL, or all 64 bytes)
    pub fn name_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(KEY_MAX);
        &self.0[..end]
    }

    /// True if every byte after the first NUL is zero, as [`RecordKey::new`]
    /// always leaves it
    pub fn is_canonical(&self) -> bool {
        let end = self.name_bytes().len();
        self.0[end..].iter().all(|&b| b == 0)
    }

    /// True if the name filled the whole field (no terminator)
    pub fn is_full(&self) -> bool {
        self.0[KEY_MAX - 1] != 0
    }
}

impl From<&str> for RecordKey {
    fn from(name: &str) -> Self {
        RecordKey::new(name.as_bytes())
    }
}

impl From<&[u8]> for RecordKey {
    fn from(name: &[u8]) -> Self {
        RecordKey::new(name)
    }
}

impl AsRef<[u8]> for RecordKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.name_bytes()))
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey({:?})", String::from_utf8_lossy(self.name_bytes()))
    }
}
