//! Persistence settings

use serde::{Deserialize, Serialize};

/// Settings applied when a store is written back to its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Cut the file to `total_size` after writing. With this off, a save
    /// over a larger earlier image leaves the old trailing bytes on disk.
    pub truncate_on_save: bool,
    /// Sync file contents to disk after each save
    pub sync_on_save: bool,
}

impl StoreConfig {
    /// Write-in-place without truncation, byte-compatible with files
    /// produced by older writers
    pub fn legacy() -> Self {
        StoreConfig {
            truncate_on_save: false,
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            truncate_on_save: true,
            sync_on_save: false,
        }
    }
}
