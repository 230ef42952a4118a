//! Whole-store file I/O
//!
//! A store file is exactly the store buffer, written from offset 0. The
//! caller opens the handle; [`StoreFile`] only reads and writes through it.

use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::FoxResult;
use crate::store::Store;

/// Handles whose length can be set after a write
pub trait SetLen {
    /// Truncate or zero-extend to `len` bytes
    fn set_len(&mut self, len: u64) -> io::Result<()>;

    /// Push written data to stable storage
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SetLen for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl SetLen for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

impl SetLen for Cursor<&mut Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

impl<T: SetLen + ?Sized> SetLen for &mut T {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

/// Store load/save over an open file handle
pub struct StoreFile<F> {
    file: F,
    config: StoreConfig,
}

impl<F> StoreFile<F> {
    /// Wrap a handle with default settings
    pub fn new(file: F) -> Self {
        Self::with_config(file, StoreConfig::default())
    }

    pub fn with_config(file: F, config: StoreConfig) -> Self {
        StoreFile { file, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get mutable reference to underlying file
    pub fn file_mut(&mut self) -> &mut F {
        &mut self.file
    }

    pub fn into_inner(self) -> F {
        self.file
    }
}

impl<F: Read + Seek> StoreFile<F> {
    /// Read the whole file from offset 0 and validate it as a store image
    pub fn load(&mut self) -> FoxResult<Store> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut data = Vec::new();
        self.file.read_to_end(&mut data)?;

        debug!("Read {} bytes of store image", data.len());
        Store::from_bytes(data)
    }
}

impl<F: Write + Seek + SetLen> StoreFile<F> {
    /// Write the store from offset 0 and flush.
    ///
    /// With `truncate_on_save` the file ends at `total_size`; otherwise any
    /// longer earlier content stays past it.
    pub fn save(&mut self, store: &Store) -> FoxResult<()> {
        let bytes = store.as_bytes();

        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;

        if self.config.truncate_on_save {
            self.file.set_len(bytes.len() as u64)?;
        }
        if self.config.sync_on_save {
            self.file.sync()?;
        }

        debug!(
            "Wrote {} bytes of store image (truncate={}, sync={})",
            bytes.len(),
            self.config.truncate_on_save,
            self.config.sync_on_save
        );
        Ok(())
    }
}

/// Open `path` read-only and load the store it holds
pub fn load_path<P: AsRef<Path>>(path: P) -> FoxResult<Store> {
    let file = File::open(path.as_ref())?;
    StoreFile::new(file).load()
}

/// Open or create `path` and save `store` into it
pub fn save_path<P: AsRef<Path>>(store: &Store, path: P, config: StoreConfig) -> FoxResult<()> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path.as_ref())?;
    StoreFile::with_config(file, config).save(store)
}
