//! Record layout and typed records
//!
//! Each record is a 73-byte header followed by a type-specific payload:
//!
//! ```text
//! u64     size      (header + payload, in bytes)
//! u8      type_tag  (1=Int, 2=Bool, 3=Str, 4=Float, 5=Binary)
//! u8[64]  key
//! payload
//! ```
//!
//! `size` is also the stride used to walk from one record to the next.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Cursor, Read, Write};

use super::key::{RecordKey, KEY_MAX};
use crate::error::{FoxError, FoxResult};

/// Record type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordType {
    /// 32-bit signed integer
    Int = 1,
    /// One-byte boolean
    Bool = 2,
    /// NUL-terminated string
    Str = 3,
    /// 32-bit IEEE float
    Float = 4,
    /// Content id + length-prefixed bytes
    Binary = 5,
}

impl RecordType {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(RecordType::Int),
            2 => Some(RecordType::Bool),
            3 => Some(RecordType::Str),
            4 => Some(RecordType::Float),
            5 => Some(RecordType::Binary),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> u8 {
        *self as u8
    }

    /// Payload size for fixed-size types
    pub fn fixed_payload_size(&self) -> Option<usize> {
        match self {
            RecordType::Int | RecordType::Float => Some(4),
            RecordType::Bool => Some(1),
            RecordType::Str | RecordType::Binary => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordType::Int => "int",
            RecordType::Bool => "bool",
            RecordType::Str => "str",
            RecordType::Float => "float",
            RecordType::Binary => "binary",
        })
    }
}

/// Header present at the start of every record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Total record length (header + payload)
    pub size: u64,
    /// Raw type tag
    pub type_tag: u8,
    /// Record key
    pub key: RecordKey,
}

impl RecordHeader {
    /// Size of a record header in bytes
    pub const SIZE: usize = 8 + 1 + KEY_MAX;

    /// Binary payload prefix: content id + length
    pub const BINARY_PREFIX: usize = 16;

    /// Read a record header from bytes
    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        if data.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record header too short",
            ));
        }
        let mut cursor = Cursor::new(data);
        let size = cursor.read_u64::<LittleEndian>()?;
        let type_tag = cursor.read_u8()?;
        let mut raw = [0u8; KEY_MAX];
        cursor.read_exact(&mut raw)?;

        Ok(RecordHeader {
            size,
            type_tag,
            key: RecordKey::from_raw(raw),
        })
    }

    /// Write the record header to `w`
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u64::<LittleEndian>(self.size)?;
        w.write_u8(self.type_tag)?;
        w.write_all(self.key.as_bytes())?;
        Ok(())
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_raw(self.type_tag)
    }
}

/// Decoded record value, borrowing variable-size payloads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Int(i32),
    Bool(bool),
    Float(f32),
    Str(&'a str),
    Binary { content_id: u64, data: &'a [u8] },
}

impl Value<'_> {
    pub fn record_type(&self) -> RecordType {
        match self {
            Value::Int(_) => RecordType::Int,
            Value::Bool(_) => RecordType::Bool,
            Value::Float(_) => RecordType::Float,
            Value::Str(_) => RecordType::Str,
            Value::Binary { .. } => RecordType::Binary,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Binary { content_id, data } => {
                write!(f, "<{} bytes, cid={:#018x}>", data.len(), content_id)
            }
        }
    }
}

/// Decode and shape-check a payload against its type tag
fn decode_value<'a>(key: &RecordKey, type_tag: u8, payload: &'a [u8]) -> FoxResult<Value<'a>> {
    let record_type = RecordType::from_raw(type_tag).ok_or_else(|| {
        FoxError::InvalidFormat(format!("Unknown type tag {} for key {}", type_tag, key))
    })?;

    if let Some(expected) = record_type.fixed_payload_size() {
        if payload.len() != expected {
            return Err(FoxError::InvalidFormat(format!(
                "{} record {} has a {}-byte payload, expected {}",
                record_type,
                key,
                payload.len(),
                expected
            )));
        }
    }

    match record_type {
        RecordType::Int => Ok(Value::Int(LittleEndian::read_i32(payload))),
        RecordType::Bool => Ok(Value::Bool(payload[0] != 0)),
        RecordType::Float => Ok(Value::Float(LittleEndian::read_f32(payload))),
        RecordType::Str => {
            let end = payload.iter().position(|&b| b == 0).ok_or_else(|| {
                FoxError::InvalidFormat(format!("Str record {} is not NUL-terminated", key))
            })?;
            let s = std::str::from_utf8(&payload[..end]).map_err(|e| {
                FoxError::InvalidFormat(format!("Str record {} is not UTF-8: {}", key, e))
            })?;
            Ok(Value::Str(s))
        }
        RecordType::Binary => {
            if payload.len() < RecordHeader::BINARY_PREFIX {
                return Err(FoxError::InvalidFormat(format!(
                    "Binary record {} payload too short",
                    key
                )));
            }
            let content_id = LittleEndian::read_u64(&payload[0..8]);
            let length = LittleEndian::read_u64(&payload[8..16]);
            let data = &payload[RecordHeader::BINARY_PREFIX..];
            if data.len() as u64 != length {
                return Err(FoxError::InvalidFormat(format!(
                    "Binary record {} declares {} bytes but carries {}",
                    key,
                    length,
                    data.len()
                )));
            }
            Ok(Value::Binary { content_id, data })
        }
    }
}

/// Borrowed view of one record inside a store buffer
///
/// Always spans exactly `size` bytes, and `size` is at least
/// [`RecordHeader::SIZE`].
#[derive(Clone, Copy)]
pub struct RecordView<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordView<'a> {
    /// Caller guarantees the slice is a whole record whose size field
    /// matches its length.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        debug_assert!(bytes.len() >= RecordHeader::SIZE);
        RecordView { bytes }
    }

    pub fn header(&self) -> RecordHeader {
        RecordHeader {
            size: self.size(),
            type_tag: self.type_tag(),
            key: self.key(),
        }
    }

    pub fn size(&self) -> u64 {
        LittleEndian::read_u64(&self.bytes[0..8])
    }

    pub fn type_tag(&self) -> u8 {
        self.bytes[8]
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_raw(self.type_tag())
    }

    pub fn key(&self) -> RecordKey {
        let mut raw = [0u8; KEY_MAX];
        raw.copy_from_slice(&self.bytes[9..RecordHeader::SIZE]);
        RecordKey::from_raw(raw)
    }

    pub(crate) fn key_field(&self) -> &'a [u8] {
        &self.bytes[9..RecordHeader::SIZE]
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[RecordHeader::SIZE..]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Decode the payload according to the type tag
    pub fn value(&self) -> FoxResult<Value<'a>> {
        decode_value(&self.key(), self.type_tag(), self.payload())
    }

    /// Copy the record out of the store
    pub fn to_record(&self) -> Record {
        Record {
            bytes: self.bytes.to_vec(),
        }
    }
}

impl fmt::Debug for RecordView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordView")
            .field("size", &self.size())
            .field("type_tag", &self.type_tag())
            .field("key", &self.key())
            .finish()
    }
}

/// An owned, byte-exact record
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    bytes: Vec<u8>,
}

impl Record {
    /// Assemble a record from a key and payload parts
    fn assemble(name: &[u8], record_type: RecordType, parts: &[&[u8]]) -> Self {
        let payload_len: usize = parts.iter().map(|p| p.len()).sum();
        let size = RecordHeader::SIZE + payload_len;

        let mut bytes = Vec::with_capacity(size);
        bytes.extend_from_slice(&(size as u64).to_le_bytes());
        bytes.push(record_type.as_raw());
        bytes.extend_from_slice(RecordKey::new(name).as_bytes());
        for part in parts {
            bytes.extend_from_slice(part);
        }
        Record { bytes }
    }

    /// Wrap bytes cut out of a store by a scan
    pub(crate) fn from_scanned(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.len() >= RecordHeader::SIZE);
        Record { bytes }
    }

    /// Build a record from raw bytes, checking the header against the length.
    ///
    /// The key field must be in the form `RecordKey::new` produces: nothing
    /// but zeros after the first NUL. Any other key could never be found by
    /// name.
    pub fn from_bytes(bytes: Vec<u8>) -> FoxResult<Self> {
        let header = RecordHeader::from_bytes(&bytes)
            .map_err(|e| FoxError::InvalidFormat(e.to_string()))?;
        if header.size != bytes.len() as u64 {
            return Err(FoxError::InvalidFormat(format!(
                "Record {} declares {} bytes but has {}",
                header.key,
                header.size,
                bytes.len()
            )));
        }
        if header.record_type().is_none() {
            return Err(FoxError::InvalidFormat(format!(
                "Unknown type tag {} for key {}",
                header.type_tag, header.key
            )));
        }
        if !header.key.is_canonical() {
            return Err(FoxError::InvalidFormat(format!(
                "Key field for {} has bytes after its terminator",
                header.key
            )));
        }
        Ok(Record { bytes })
    }

    pub fn view(&self) -> RecordView<'_> {
        RecordView::new(&self.bytes)
    }

    pub fn header(&self) -> RecordHeader {
        self.view().header()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn type_tag(&self) -> u8 {
        self.bytes[8]
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_raw(self.type_tag())
    }

    pub fn key(&self) -> RecordKey {
        self.view().key()
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[RecordHeader::SIZE..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn value(&self) -> FoxResult<Value<'_>> {
        self.view().value()
    }

    /// Downcast to a typed record
    pub fn downcast<T: TypedRecord>(self) -> FoxResult<T> {
        T::from_record(self)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("size", &self.size())
            .field("type_tag", &self.type_tag())
            .field("key", &self.key())
            .finish()
    }
}

/// A record known to be of one specific type
pub trait TypedRecord: Sized + Into<Record> {
    const RECORD_TYPE: RecordType;

    /// Check the type tag and payload shape, then wrap
    fn from_record(record: Record) -> FoxResult<Self>;

    fn record(&self) -> &Record;

    fn key(&self) -> RecordKey {
        self.record().key()
    }
}

macro_rules! typed_record {
    ($(#[$meta:meta])* $name:ident, $record_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(Record);

        impl TypedRecord for $name {
            const RECORD_TYPE: RecordType = $record_type;

            fn from_record(record: Record) -> FoxResult<Self> {
                if record.type_tag() != Self::RECORD_TYPE.as_raw() {
                    return Err(FoxError::TypeMismatch {
                        key: record.key().to_string(),
                        expected: Self::RECORD_TYPE,
                        found: record.type_tag(),
                    });
                }
                record.value()?;
                Ok($name(record))
            }

            fn record(&self) -> &Record {
                &self.0
            }
        }

        impl From<$name> for Record {
            fn from(typed: $name) -> Record {
                typed.0
            }
        }
    };
}

typed_record!(
    /// Record holding an `i32`
    IntRecord,
    RecordType::Int
);
typed_record!(
    /// Record holding a `bool`
    BoolRecord,
    RecordType::Bool
);
typed_record!(
    /// Record holding a NUL-terminated string
    StrRecord,
    RecordType::Str
);
typed_record!(
    /// Record holding an `f32`
    FloatRecord,
    RecordType::Float
);
typed_record!(
    /// Record holding an opaque content id and a byte blob
    BinaryRecord,
    RecordType::Binary
);

impl IntRecord {
    pub fn new(name: &str, value: i32) -> Self {
        IntRecord(Record::assemble(
            name.as_bytes(),
            RecordType::Int,
            &[&value.to_le_bytes()],
        ))
    }

    pub fn value(&self) -> i32 {
        LittleEndian::read_i32(self.0.payload())
    }
}

impl BoolRecord {
    pub fn new(name: &str, value: bool) -> Self {
        BoolRecord(Record::assemble(
            name.as_bytes(),
            RecordType::Bool,
            &[&[value as u8]],
        ))
    }

    pub fn value(&self) -> bool {
        self.0.payload()[0] != 0
    }
}

impl FloatRecord {
    pub fn new(name: &str, value: f32) -> Self {
        FloatRecord(Record::assemble(
            name.as_bytes(),
            RecordType::Float,
            &[&value.to_le_bytes()],
        ))
    }

    pub fn value(&self) -> f32 {
        LittleEndian::read_f32(self.0.payload())
    }
}

impl StrRecord {
    /// The stored string ends at its first NUL, and the payload always
    /// carries one terminator.
    pub fn new(name: &str, value: &str) -> Self {
        let bytes = value.as_bytes();
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        StrRecord(Record::assemble(
            name.as_bytes(),
            RecordType::Str,
            &[&bytes[..len], &[0]],
        ))
    }

    pub fn value(&self) -> &str {
        let payload = self.0.payload();
        let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
        // UTF-8 validity is checked in from_record and guaranteed by new
        std::str::from_utf8(&payload[..end]).unwrap_or_default()
    }
}

impl BinaryRecord {
    pub fn new(name: &str, content_id: u64, data: &[u8]) -> Self {
        BinaryRecord(Record::assemble(
            name.as_bytes(),
            RecordType::Binary,
            &[
                &content_id.to_le_bytes(),
                &(data.len() as u64).to_le_bytes(),
                data,
            ],
        ))
    }

    pub fn content_id(&self) -> u64 {
        LittleEndian::read_u64(&self.0.payload()[0..8])
    }

    pub fn len(&self) -> u64 {
        LittleEndian::read_u64(&self.0.payload()[8..16])
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.0.payload()[RecordHeader::BINARY_PREFIX..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_header_size() {
        assert_eq!(RecordHeader::SIZE, 73);
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(IntRecord::new("age", 30).record().size(), 77);
        assert_eq!(BoolRecord::new("on", true).record().size(), 74);
        assert_eq!(FloatRecord::new("ratio", 2.5).record().size(), 77);
        assert_eq!(StrRecord::new("name", "fox").record().size(), 77);
        assert_eq!(BinaryRecord::new("blob", 7, &[1, 2, 3]).record().size(), 73 + 16 + 3);

        let empty_str = StrRecord::new("k", "");
        assert_eq!(empty_str.record().size(), 74);
        assert_eq!(empty_str.record().payload(), b"\0");
        assert_eq!(empty_str.value(), "");

        let empty_bin = BinaryRecord::new("k", 0, &[]);
        assert_eq!(empty_bin.record().size(), 89);
        assert!(empty_bin.is_empty());
        assert_eq!(empty_bin.record().payload(), &[0u8; 16][..]);
    }

    #[test]
    fn test_int_record_layout() {
        let record: Record = IntRecord::new("age", -2).into();
        let bytes = record.as_bytes();
        assert_eq!(&bytes[0..8], &77u64.to_le_bytes());
        assert_eq!(bytes[8], 1);
        assert_eq!(&bytes[9..12], b"age");
        assert!(bytes[12..73].iter().all(|&b| b == 0));
        assert_eq!(&bytes[73..77], &(-2i32).to_le_bytes());
    }

    #[test]
    fn test_str_payload_has_terminator() {
        let record = StrRecord::new("name", "fox");
        assert_eq!(record.record().payload(), b"fox\0");
        assert_eq!(record.value(), "fox");

        let cut = StrRecord::new("name", "ab\0cd");
        assert_eq!(cut.record().payload(), b"ab\0");
        assert_eq!(cut.value(), "ab");
    }

    #[test]
    fn test_binary_payload_layout() {
        let record = BinaryRecord::new("blob", 0xABCD, b"hello");
        let payload = record.record().payload();
        assert_eq!(&payload[0..8], &0xABCDu64.to_le_bytes());
        assert_eq!(&payload[8..16], &5u64.to_le_bytes());
        assert_eq!(&payload[16..], b"hello");
        assert_eq!(record.content_id(), 0xABCD);
        assert_eq!(record.data(), b"hello");
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_value_decoding() {
        let record: Record = FloatRecord::new("pi", 1.5).into();
        assert_eq!(record.value().unwrap(), Value::Float(1.5));
        let record: Record = BoolRecord::new("on", true).into();
        assert_eq!(record.value().unwrap(), Value::Bool(true));
        let record: Record = BinaryRecord::new("b", 9, &[4, 5]).into();
        assert_eq!(
            record.value().unwrap(),
            Value::Binary {
                content_id: 9,
                data: &[4, 5]
            }
        );
    }

    #[test]
    fn test_downcast_checks_type_tag() {
        let record: Record = IntRecord::new("age", 30).into();
        let err = record.clone().downcast::<StrRecord>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(record.downcast::<IntRecord>().unwrap().value(), 30);
    }

    #[test]
    fn test_from_bytes_validates_size() {
        let mut bytes = IntRecord::new("age", 30).record().as_bytes().to_vec();
        assert!(Record::from_bytes(bytes.clone()).is_ok());
        bytes.push(0);
        let err = Record::from_bytes(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_from_bytes_rejects_unknown_tag() {
        let mut bytes = IntRecord::new("age", 30).record().as_bytes().to_vec();
        bytes[8] = 9;
        let err = Record::from_bytes(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_from_bytes_rejects_bytes_after_key_terminator() {
        let mut bytes = IntRecord::new("ab", 30).record().as_bytes().to_vec();
        bytes[9 + 3] = b'z';
        let err = Record::from_bytes(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        let full = IntRecord::new(&"k".repeat(64), 1).record().as_bytes().to_vec();
        assert!(Record::from_bytes(full).is_ok());
    }

    #[test]
    fn test_bad_binary_length_is_rejected() {
        let mut bytes = BinaryRecord::new("b", 1, &[1, 2, 3]).record().as_bytes().to_vec();
        bytes[73 + 8..73 + 16].copy_from_slice(&10u64.to_le_bytes());
        let record = Record::from_bytes(bytes).unwrap();
        assert_eq!(record.value().unwrap_err().kind(), ErrorKind::InvalidFormat);
        assert!(record.downcast::<BinaryRecord>().is_err());
    }

    #[test]
    fn test_header_roundtrip() {
        let header = RecordHeader {
            size: 100,
            type_tag: RecordType::Str.as_raw(),
            key: RecordKey::from("title"),
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), RecordHeader::SIZE);
        assert_eq!(RecordHeader::from_bytes(&buf).unwrap(), header);
    }

    #[test]
    fn test_type_tags() {
        for raw in 1..=5u8 {
            assert_eq!(RecordType::from_raw(raw).unwrap().as_raw(), raw);
        }
        assert!(RecordType::from_raw(0).is_none());
        assert!(RecordType::from_raw(6).is_none());
    }
}
