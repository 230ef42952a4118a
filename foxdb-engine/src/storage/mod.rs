//! Storage layer for the FoxDB binary layout
//!
//! This module defines the byte-exact shape of a store image:
//! - File header (magic + total size)
//! - Fixed-width record keys
//! - Record header and the five typed record variants
//!
//! All integers are little-endian and nothing is padded or aligned.

pub mod header;
pub mod key;
pub mod record;

pub use header::{FileHeader, MAGIC};
pub use key::{RecordKey, KEY_MAX};
pub use record::{
    BinaryRecord, BoolRecord, FloatRecord, IntRecord, Record, RecordHeader, RecordType,
    RecordView, StrRecord, TypedRecord, Value,
};
