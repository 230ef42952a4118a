//! File header - the first 12 bytes of every store image
//!
//! ```text
//! offset 0: u32 magic       = 0xF0DBBABE
//! offset 4: u64 total_size  (bytes, including this header)
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Write};

use crate::error::{FoxError, FoxResult};

/// Magic number stamped at offset 0 of every store
pub const MAGIC: u32 = 0xF0DB_BABE;

/// Store file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Format stamp, always [`MAGIC`] for a valid image
    pub magic: u32,
    /// Byte length of the whole store, header included
    pub total_size: u64,
}

impl FileHeader {
    /// Size of the file header in bytes
    pub const SIZE: usize = 12;

    /// Header of an empty store
    pub fn empty() -> Self {
        FileHeader {
            magic: MAGIC,
            total_size: Self::SIZE as u64,
        }
    }

    /// Parse and validate a file header from the start of `data`
    pub fn from_bytes(data: &[u8]) -> FoxResult<Self> {
        if data.len() < Self::SIZE {
            return Err(FoxError::InvalidFormat(format!(
                "File header too short: {} bytes",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        let magic = cursor.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(FoxError::BadMagic(magic));
        }
        let total_size = cursor.read_u64::<LittleEndian>()?;

        Ok(FileHeader { magic, total_size })
    }

    /// Write the header to `w`
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.magic)?;
        w.write_u64::<LittleEndian>(self.total_size)?;
        Ok(())
    }

    /// Serialize the header to its 12-byte form
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..12].copy_from_slice(&self.total_size.to_le_bytes());
        buf
    }
}
