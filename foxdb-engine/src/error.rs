//! Error handling for FoxDB
//!
//! Contract violations (duplicate insert, update of a missing key, typed
//! access with the wrong type, bad magic on load) are reported as explicit
//! errors. A missing key on `get`/`remove` is not an error: those calls
//! return `None`.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

use crate::storage::record::RecordType;

/// Class of a [`FoxError`], for callers that branch on the failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Insert of a key that is already present
    DuplicateKey,
    /// Update of a key that is not present
    KeyNotFound,
    /// Typed access to a record of another type
    TypeMismatch,
    /// Image does not start with the FoxDB magic number
    BadMagic,
    /// Malformed header, record or payload
    InvalidFormat,
    /// Growing the store buffer failed
    OutOfMemory,
    /// Underlying I/O failure
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::KeyNotFound => "key not found",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::BadMagic => "bad magic",
            ErrorKind::InvalidFormat => "invalid format",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::Io => "I/O error",
        })
    }
}

/// Main error type for the FoxDB engine
#[derive(Error, Debug)]
pub enum FoxError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Type mismatch for key {key}: expected {expected}, found type tag {found}")]
    TypeMismatch {
        key: String,
        expected: RecordType,
        found: u8,
    },

    #[error("Bad magic number: {0:#010x}")]
    BadMagic(u32),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Allocation failed: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FoxError {
    /// Get the error class
    pub fn kind(&self) -> ErrorKind {
        match self {
            FoxError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            FoxError::KeyNotFound(_) => ErrorKind::KeyNotFound,
            FoxError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            FoxError::BadMagic(_) => ErrorKind::BadMagic,
            FoxError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            FoxError::OutOfMemory(_) => ErrorKind::OutOfMemory,
            FoxError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type for FoxDB operations
pub type FoxResult<T> = Result<T, FoxError>;
