//! Store engine
//!
//! A [`Store`] owns one contiguous buffer: the file header followed by
//! packed records. Every lookup is a linear scan from the first record,
//! stepping by each record's `size` field. Mutations take `&mut self`, so
//! no view into the buffer can outlive a grow or shrink.
//!
//! The header's `total_size` always equals the buffer length once a call
//! returns.

use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{FoxError, FoxResult};
use crate::storage::header::FileHeader;
use crate::storage::key::RecordKey;
use crate::storage::record::{
    BinaryRecord, BoolRecord, FloatRecord, IntRecord, Record, RecordHeader, RecordView,
    StrRecord, TypedRecord,
};

/// An in-memory FoxDB store
#[derive(Clone, PartialEq, Eq)]
pub struct Store {
    data: Vec<u8>,
}

impl Store {
    /// Create an empty store (header only)
    pub fn new() -> Self {
        Store {
            data: FileHeader::empty().to_bytes().to_vec(),
        }
    }

    /// Adopt a store image.
    ///
    /// Checks the magic number and that `total_size` fits the image. Bytes
    /// past `total_size` are dropped. Records are not checked here; see
    /// [`Store::verify`].
    pub fn from_bytes(mut data: Vec<u8>) -> FoxResult<Self> {
        let header = FileHeader::from_bytes(&data)?;

        if header.total_size < FileHeader::SIZE as u64 {
            return Err(FoxError::InvalidFormat(format!(
                "Total size {} is smaller than the file header",
                header.total_size
            )));
        }
        if header.total_size > data.len() as u64 {
            return Err(FoxError::InvalidFormat(format!(
                "Total size {} exceeds image length {}",
                header.total_size,
                data.len()
            )));
        }
        if header.total_size < data.len() as u64 {
            debug!(
                "Ignoring {} trailing bytes past total size {}",
                data.len() as u64 - header.total_size,
                header.total_size
            );
            data.truncate(header.total_size as usize);
            data.shrink_to_fit();
        }

        Ok(Store { data })
    }

    /// Byte length of the store, header included
    pub fn total_size(&self) -> u64 {
        LittleEndian::read_u64(&self.data[4..FileHeader::SIZE])
    }

    fn set_total_size(&mut self, total_size: u64) {
        LittleEndian::write_u64(&mut self.data[4..FileHeader::SIZE], total_size);
    }

    /// The whole store image (exactly `total_size` bytes)
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == FileHeader::SIZE
    }

    /// Records in physical order, paired with their byte offset
    pub fn iter(&self) -> RecordIter<'_> {
        RecordIter {
            data: &self.data,
            offset: FileHeader::SIZE,
            stopped_at: None,
        }
    }

    /// Call `visitor` for every record in physical order.
    ///
    /// The view borrows the store buffer and cannot be kept past the call.
    pub fn iterate<F>(&self, mut visitor: F)
    where
        F: FnMut(RecordView<'_>, u64),
    {
        for (offset, record) in self.iter() {
            visitor(record, offset);
        }
    }

    /// Locate a record by key: (offset, view)
    fn find(&self, key: &RecordKey) -> Option<(usize, RecordView<'_>)> {
        self.iter()
            .find(|(_, record)| record.key_field() == key.as_bytes())
            .map(|(offset, record)| (offset as usize, record))
    }

    /// Key lookup for a mutation.
    ///
    /// Unlike [`Store::contains_key`], a scan that stops on a malformed
    /// record before reaching `total_size` is an error: records past that
    /// point cannot be checked, and anything appended after them would be
    /// unreachable.
    fn contains_checked(&self, key: &RecordKey) -> FoxResult<bool> {
        let mut records = self.iter();
        if records.by_ref().any(|(_, record)| record.key_field() == key.as_bytes()) {
            return Ok(true);
        }
        match records.stopped_at() {
            Some(offset) => Err(self.scan_stopped(offset)),
            None => Ok(false),
        }
    }

    fn scan_stopped(&self, offset: u64) -> FoxError {
        FoxError::InvalidFormat(format!(
            "Record scan stopped at offset {} of {}",
            offset,
            self.total_size()
        ))
    }

    /// Fail unless a scan reaches the end of the store
    fn check_scan(&self) -> FoxResult<()> {
        let mut records = self.iter();
        for _ in records.by_ref() {}
        match records.stopped_at() {
            Some(offset) => Err(self.scan_stopped(offset)),
            None => Ok(()),
        }
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, name: K) -> bool {
        self.find(&RecordKey::new(name.as_ref())).is_some()
    }

    /// Copy out the record stored under `name`
    pub fn get<K: AsRef<[u8]>>(&self, name: K) -> Option<Record> {
        self.find(&RecordKey::new(name.as_ref()))
            .map(|(_, record)| record.to_record())
    }

    /// Append a record.
    ///
    /// The record is consumed. Fails with `DuplicateKey` if its key is
    /// already present, `InvalidFormat` if the existing records cannot all be
    /// scanned or the key field is malformed, or `OutOfMemory` if the buffer
    /// cannot grow. On any failure the store is unchanged.
    pub fn insert<R: Into<Record>>(&mut self, record: R) -> FoxResult<()> {
        let record = record.into();
        let key = record.key();

        if !key.is_canonical() {
            return Err(FoxError::InvalidFormat(format!(
                "Key field for {} has bytes after its terminator",
                key
            )));
        }
        if self.contains_checked(&key)? {
            return Err(FoxError::DuplicateKey(key.to_string()));
        }

        let bytes = record.as_bytes();
        self.data.try_reserve_exact(bytes.len())?;
        self.data.extend_from_slice(bytes);
        let total_size = self.data.len() as u64;
        self.set_total_size(total_size);

        debug!(
            "Inserted record {} (type tag {}, {} bytes), total size {}",
            key,
            record.type_tag(),
            bytes.len(),
            total_size
        );
        Ok(())
    }

    /// Remove the record stored under `name`, closing the gap it leaves.
    ///
    /// Returns the removed record, or `None` if no record matched.
    pub fn remove<K: AsRef<[u8]>>(&mut self, name: K) -> Option<Record> {
        let key = RecordKey::new(name.as_ref());
        let (offset, size) = self
            .find(&key)
            .map(|(offset, record)| (offset, record.as_bytes().len()))?;

        let removed: Vec<u8> = self.data.drain(offset..offset + size).collect();
        let total_size = self.data.len() as u64;
        self.set_total_size(total_size);
        self.data.shrink_to_fit();

        debug!(
            "Removed record {} at offset {} ({} bytes), total size {}",
            key, offset, size, total_size
        );
        Some(Record::from_scanned(removed))
    }

    /// Replace the record stored under `record`'s key.
    ///
    /// Runs as remove followed by insert. A store whose records cannot all
    /// be scanned is rejected with `InvalidFormat` before anything is removed.
    /// Otherwise it is not atomic: if the insert fails the key is left absent.
    pub fn update<R: Into<Record>>(&mut self, record: R) -> FoxResult<()> {
        let record = record.into();
        let key = record.key();

        self.check_scan()?;
        if self.remove(key).is_none() {
            return Err(FoxError::KeyNotFound(key.to_string()));
        }
        self.insert(record)
    }

    /// Look up `name` and downcast to `T`.
    ///
    /// `Ok(None)` if absent, `TypeMismatch` if the stored type differs.
    pub fn get_typed<T: TypedRecord, K: AsRef<[u8]>>(&self, name: K) -> FoxResult<Option<T>> {
        self.get(name).map(T::from_record).transpose()
    }

    pub fn get_int<K: AsRef<[u8]>>(&self, name: K) -> FoxResult<Option<IntRecord>> {
        self.get_typed(name)
    }

    pub fn get_bool<K: AsRef<[u8]>>(&self, name: K) -> FoxResult<Option<BoolRecord>> {
        self.get_typed(name)
    }

    pub fn get_str<K: AsRef<[u8]>>(&self, name: K) -> FoxResult<Option<StrRecord>> {
        self.get_typed(name)
    }

    pub fn get_float<K: AsRef<[u8]>>(&self, name: K) -> FoxResult<Option<FloatRecord>> {
        self.get_typed(name)
    }

    pub fn get_binary<K: AsRef<[u8]>>(&self, name: K) -> FoxResult<Option<BinaryRecord>> {
        self.get_typed(name)
    }

    /// Walk every record strictly.
    ///
    /// Checks that each record fits, has a known type tag and a payload of
    /// the right shape, that keys are unique, and that the last record ends
    /// exactly at `total_size`.
    pub fn verify(&self) -> FoxResult<()> {
        let total_size = self.data.len();
        if self.total_size() != total_size as u64 {
            return Err(FoxError::InvalidFormat(format!(
                "Header total size {} does not match buffer length {}",
                self.total_size(),
                total_size
            )));
        }

        let mut keys = HashSet::new();
        let mut offset = FileHeader::SIZE;
        while offset < total_size {
            let header = RecordHeader::from_bytes(&self.data[offset..]).map_err(|_| {
                FoxError::InvalidFormat(format!("Truncated record header at offset {}", offset))
            })?;

            let remaining = (total_size - offset) as u64;
            if header.size < RecordHeader::SIZE as u64 || header.size > remaining {
                return Err(FoxError::InvalidFormat(format!(
                    "Record {} at offset {} has invalid size {}",
                    header.key, offset, header.size
                )));
            }

            let end = offset + header.size as usize;
            RecordView::new(&self.data[offset..end]).value()?;

            if !header.key.is_canonical() {
                return Err(FoxError::InvalidFormat(format!(
                    "Key field for {} at offset {} has bytes after its terminator",
                    header.key, offset
                )));
            }
            if !keys.insert(header.key) {
                return Err(FoxError::InvalidFormat(format!(
                    "Duplicate key {} at offset {}",
                    header.key, offset
                )));
            }
            offset = end;
        }

        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("total_size", &self.total_size())
            .field("records", &self.len())
            .finish()
    }
}

/// Iterator over the records of a [`Store`]
///
/// A record whose size is smaller than a record header or runs past the end
/// of the buffer ends the scan.
pub struct RecordIter<'a> {
    data: &'a [u8],
    offset: usize,
    stopped_at: Option<usize>,
}

impl RecordIter<'_> {
    /// Offset of the malformed record that ended the scan early, if any
    pub fn stopped_at(&self) -> Option<u64> {
        self.stopped_at.map(|offset| offset as u64)
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = (u64, RecordView<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }

        let remaining = self.data.len() - self.offset;
        if remaining < RecordHeader::SIZE {
            warn!(
                "Truncated record header at offset {} ({} bytes left), stopping scan",
                self.offset, remaining
            );
            self.stopped_at = Some(self.offset);
            self.offset = self.data.len();
            return None;
        }

        let size = LittleEndian::read_u64(&self.data[self.offset..self.offset + 8]);
        if size < RecordHeader::SIZE as u64 || size > remaining as u64 {
            warn!(
                "Invalid record size {} at offset {}, stopping scan",
                size, self.offset
            );
            self.stopped_at = Some(self.offset);
            self.offset = self.data.len();
            return None;
        }

        let start = self.offset;
        self.offset += size as usize;
        Some((start as u64, RecordView::new(&self.data[start..self.offset])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::record::{RecordType, Value};

    fn keys(store: &Store) -> Vec<String> {
        store.iter().map(|(_, r)| r.key().to_string()).collect()
    }

    fn record_sum(store: &Store) -> u64 {
        store.iter().map(|(_, r)| r.size()).sum()
    }

    #[test]
    fn test_new_store_is_header_only() {
        let store = Store::new();
        assert_eq!(store.total_size(), 12);
        assert_eq!(store.as_bytes().len(), 12);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn test_age_name_scenario() {
        let mut store = Store::new();
        store.insert(IntRecord::new("age", 30)).unwrap();
        store.insert(StrRecord::new("name", "fox")).unwrap();

        assert_eq!(store.get_int("age").unwrap().unwrap().value(), 30);
        assert_eq!(store.total_size(), 12 + (73 + 4) + (73 + 4));

        let before = store.total_size();
        let removed = store.remove("age").unwrap();
        assert_eq!(removed.size(), 77);
        assert_eq!(store.total_size(), before - 77);
        assert!(store.get("age").is_none());
        assert_eq!(store.get_str("name").unwrap().unwrap().value(), "fox");
    }

    #[test]
    fn test_get_returns_byte_exact_copy() {
        let mut store = Store::new();
        let record: Record = BinaryRecord::new("blob", 42, &[1, 2, 3, 4]).into();
        store.insert(record.clone()).unwrap();
        assert_eq!(store.get("blob").unwrap(), record);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut store = Store::new();
        store.insert(IntRecord::new("age", 1)).unwrap();
        let before = store.clone();

        let err = store.insert(BoolRecord::new("age", true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_missing_key() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", 1)).unwrap();
        let before = store.clone();
        assert!(store.remove("b").is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_from_middle_shifts_tail() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", 1)).unwrap();
        store.insert(StrRecord::new("b", "middle")).unwrap();
        store.insert(FloatRecord::new("c", 0.5)).unwrap();

        store.remove("b").unwrap();
        assert_eq!(keys(&store), vec!["a", "c"]);
        let offsets: Vec<u64> = store.iter().map(|(offset, _)| offset).collect();
        assert_eq!(offsets, vec![12, 12 + 77]);
        assert_eq!(store.get_float("c").unwrap().unwrap().value(), 0.5);
        assert_eq!(store.total_size(), 12 + record_sum(&store));
        store.verify().unwrap();
    }

    #[test]
    fn test_size_invariant_through_mutations() {
        let mut store = Store::new();
        for i in 0..10 {
            store.insert(StrRecord::new(&format!("k{}", i), &"x".repeat(i))).unwrap();
            assert_eq!(store.total_size(), 12 + record_sum(&store));
        }
        for i in (0..10).step_by(3) {
            store.remove(format!("k{}", i)).unwrap();
            assert_eq!(store.total_size(), 12 + record_sum(&store));
        }
        store.update(IntRecord::new("k1", 7)).unwrap();
        assert_eq!(store.total_size(), 12 + record_sum(&store));
        assert_eq!(store.total_size(), store.as_bytes().len() as u64);
        store.verify().unwrap();
    }

    #[test]
    fn test_iteration_order_follows_insertion_history() {
        let mut store = Store::new();
        for name in ["one", "two", "three", "four"] {
            store.insert(BoolRecord::new(name, true)).unwrap();
        }
        store.remove("two").unwrap();
        store.insert(BoolRecord::new("two", false)).unwrap();
        assert_eq!(keys(&store), vec!["one", "three", "four", "two"]);

        for key in keys(&store) {
            assert!(store.get(&key).is_some());
        }
    }

    #[test]
    fn test_iterate_reports_offsets() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", 1)).unwrap();
        store.insert(StrRecord::new("b", "hello")).unwrap();
        store.insert(BoolRecord::new("c", false)).unwrap();

        let mut seen = Vec::new();
        store.iterate(|record, offset| seen.push((record.key().to_string(), offset)));
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), 12),
                ("b".to_string(), 12 + 77),
                ("c".to_string(), 12 + 77 + 79),
            ]
        );
    }

    #[test]
    fn test_update_replaces_and_moves_to_end() {
        let mut store = Store::new();
        store.insert(IntRecord::new("age", 30)).unwrap();
        store.insert(StrRecord::new("name", "fox")).unwrap();

        store.update(StrRecord::new("age", "thirty")).unwrap();
        assert_eq!(keys(&store), vec!["name", "age"]);
        assert_eq!(store.get_str("age").unwrap().unwrap().value(), "thirty");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_missing_key_is_rejected() {
        let mut store = Store::new();
        let err = store.update(IntRecord::new("age", 30)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert!(store.is_empty());
    }

    #[test]
    fn test_typed_access_rejects_other_types() {
        let mut store = Store::new();
        store.insert(IntRecord::new("i", 1)).unwrap();
        store.insert(BoolRecord::new("b", true)).unwrap();
        store.insert(StrRecord::new("s", "str")).unwrap();
        store.insert(FloatRecord::new("f", 1.25)).unwrap();
        store.insert(BinaryRecord::new("x", 5, b"bin")).unwrap();

        assert_eq!(store.get_int("i").unwrap().unwrap().value(), 1);
        assert!(store.get_bool("b").unwrap().unwrap().value());
        assert_eq!(store.get_str("s").unwrap().unwrap().value(), "str");
        assert_eq!(store.get_float("f").unwrap().unwrap().value(), 1.25);
        let bin = store.get_binary("x").unwrap().unwrap();
        assert_eq!((bin.content_id(), bin.data()), (5, &b"bin"[..]));

        // Rows follow the insertion order above, columns the accessors below
        let accessors: [fn(&Store, &str) -> FoxResult<bool>; 5] = [
            |s, k| s.get_int(k).map(|r| r.is_some()),
            |s, k| s.get_bool(k).map(|r| r.is_some()),
            |s, k| s.get_str(k).map(|r| r.is_some()),
            |s, k| s.get_float(k).map(|r| r.is_some()),
            |s, k| s.get_binary(k).map(|r| r.is_some()),
        ];
        for (row, key) in ["i", "b", "s", "f", "x"].into_iter().enumerate() {
            for (col, accessor) in accessors.iter().enumerate() {
                let result = accessor(&store, key);
                if row == col {
                    assert!(result.unwrap(), "{} via accessor {}", key, col);
                } else {
                    let err = result.unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::TypeMismatch, "{} via accessor {}", key, col);
                }
            }
        }

        assert!(store.get_int("missing").unwrap().is_none());
    }

    #[test]
    fn test_long_keys_match_on_first_64_bytes() {
        let prefix = "n".repeat(64);
        let mut store = Store::new();
        store.insert(IntRecord::new(&format!("{}A", prefix), 1)).unwrap();

        assert!(store.contains_key(format!("{}B", prefix)));
        let err = store.insert(IntRecord::new(&prefix, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert!(!store.contains_key(&prefix[..63]));
    }

    #[test]
    fn test_from_bytes_drops_stale_tail() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", 1)).unwrap();
        let mut image = store.as_bytes().to_vec();
        image.extend_from_slice(&[0xAA; 40]);

        let loaded = Store::from_bytes(image).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_from_bytes_rejects_bad_images() {
        let mut image = Store::new().into_bytes();
        image[0] ^= 0xFF;
        assert_eq!(Store::from_bytes(image).unwrap_err().kind(), ErrorKind::BadMagic);

        let mut image = Store::new().into_bytes();
        image[4..12].copy_from_slice(&500u64.to_le_bytes());
        assert_eq!(
            Store::from_bytes(image).unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );

        let mut image = Store::new().into_bytes();
        image[4..12].copy_from_slice(&4u64.to_le_bytes());
        assert_eq!(
            Store::from_bytes(image).unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
    }

    #[test]
    fn test_corrupt_record_size_stops_scan() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", 1)).unwrap();
        store.insert(IntRecord::new("b", 2)).unwrap();

        let mut image = store.into_bytes();
        let second = 12 + 77;
        image[second..second + 8].copy_from_slice(&0u64.to_le_bytes());
        let corrupt = Store::from_bytes(image).unwrap();

        assert_eq!(keys(&corrupt), vec!["a"]);
        assert!(corrupt.get("b").is_none());
        assert_eq!(corrupt.verify().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_mutations_after_corrupt_record_are_rejected() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", 1)).unwrap();
        store.insert(IntRecord::new("b", 2)).unwrap();

        let mut image = store.into_bytes();
        let second = 12 + 77;
        image[second..second + 8].copy_from_slice(&0u64.to_le_bytes());
        let mut corrupt = Store::from_bytes(image).unwrap();
        let before = corrupt.clone();

        let err = corrupt.insert(IntRecord::new("c", 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(corrupt, before);

        let err = corrupt.insert(IntRecord::new("a", 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);

        let err = corrupt.update(IntRecord::new("a", 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(corrupt, before);
        assert_eq!(corrupt.get_int("a").unwrap().unwrap().value(), 1);

        let mut records = corrupt.iter();
        assert_eq!(records.by_ref().count(), 1);
        assert_eq!(records.stopped_at(), Some(second as u64));
    }

    #[test]
    fn test_key_with_bytes_after_terminator_is_rejected() {
        let mut store = Store::new();
        store.insert(IntRecord::new("ab", 1)).unwrap();
        let mut image = store.into_bytes();
        image[12 + 9 + 3] = b'z';

        let loaded = Store::from_bytes(image).unwrap();
        assert!(loaded.get("ab").is_none());
        assert_eq!(loaded.verify().unwrap_err().kind(), ErrorKind::InvalidFormat);

        let (_, view) = loaded.iter().next().unwrap();
        let mut fresh = Store::new();
        let err = fresh.insert(view.to_record()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_empty_str_and_binary_roundtrip() {
        let mut store = Store::new();
        store.insert(StrRecord::new("s", "")).unwrap();
        store.insert(BinaryRecord::new("x", 0, &[])).unwrap();
        assert_eq!(store.total_size(), 12 + 74 + 89);

        assert_eq!(store.get("s").unwrap().size(), 74);
        assert_eq!(store.get_str("s").unwrap().unwrap().value(), "");
        let bin = store.get_binary("x").unwrap().unwrap();
        assert_eq!(bin.record().size(), 89);
        assert!(bin.is_empty());
        assert_eq!(bin.content_id(), 0);
        assert!(bin.data().is_empty());
        store.verify().unwrap();
    }

    #[test]
    fn test_verify_catches_bad_payload() {
        let mut store = Store::new();
        store.insert(StrRecord::new("s", "abc")).unwrap();
        let mut image = store.into_bytes();
        let last = image.len() - 1;
        image[last] = b'!';

        let store = Store::from_bytes(image).unwrap();
        let record = store.get("s").unwrap();
        assert_eq!(record.record_type(), Some(RecordType::Str));
        assert!(record.value().is_err());
        assert_eq!(store.verify().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_iterated_views_decode() {
        let mut store = Store::new();
        store.insert(IntRecord::new("a", -5)).unwrap();
        store.insert(StrRecord::new("b", "bee")).unwrap();
        let values: Vec<String> = store
            .iter()
            .map(|(_, r)| r.value().unwrap().to_string())
            .collect();
        assert_eq!(values, vec!["-5", "\"bee\""]);
        assert!(matches!(
            store.iter().next().unwrap().1.value().unwrap(),
            Value::Int(-5)
        ));
    }
}
