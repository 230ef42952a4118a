//! FoxDB Engine - single-file typed key/value record store
//!
//! A store is one contiguous byte buffer: a 12-byte file header followed by
//! packed, variable-length, typed records addressed by a fixed 64-byte key.
//! The same bytes are the on-disk image.

pub mod config;
pub mod error;
pub mod file_io;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::{ErrorKind, FoxError, FoxResult};
pub use file_io::{SetLen, StoreFile};
pub use storage::{
    BinaryRecord, BoolRecord, FileHeader, FloatRecord, IntRecord, Record, RecordHeader,
    RecordKey, RecordType, RecordView, StrRecord, TypedRecord, Value,
};
pub use store::{RecordIter, Store};
