//! The record store: an NDEF message as two cross-indexed sequences.
//!
//! Abstract records are the durable, logical message. Raw records are a
//! cache of the last encode or decode and are dropped whenever the
//! abstract sequence is edited structurally.

use crate::error::{MoveError, Result};
use crate::types::{RawRecord, Record};
use std::ops::Index;
use tracing::debug;

/// An NDEF message.
///
/// Mutations take `&mut self`; sharing a store between threads needs an
/// external lock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordStore {
    /// Logical records, in message order.
    pub(crate) records: Vec<Record>,

    /// Wire records from the last encode or decode.
    pub(crate) raw: Vec<RawRecord>,
}

impl RecordStore {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Read access ---

    /// Number of abstract records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Raw records of the last encode or decode.
    pub fn raw_records(&self) -> &[RawRecord] {
        &self.raw
    }

    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }

    // --- Raw cache ---

    /// Drop the raw cache and every abstract record's reference into it.
    pub fn raw_clear(&mut self) {
        self.raw.clear();
        for record in &mut self.records {
            record.raw_span = None;
        }
    }

    /// Delete all records, abstract and raw.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.records.clear();
    }

    fn invalidate_raw(&mut self) {
        if !self.raw.is_empty() {
            debug!(raw = self.raw.len(), "dropping raw records after structural edit");
            self.raw_clear();
        }
    }

    // --- Copying insertion ---

    /// Insert a copy of `record` at `index` (clamped to the length).
    pub fn insert(&mut self, index: usize, record: &Record) -> Result<()> {
        self.insert_n(index, std::slice::from_ref(record))
    }

    /// Insert copies of `records` at `index`, keeping their order.
    ///
    /// Either every record is copied in or, on allocation failure, the
    /// store is left untouched.
    pub fn insert_n(&mut self, index: usize, records: &[Record]) -> Result<()> {
        let mut copies = Vec::new();
        copies.try_reserve_exact(records.len())?;
        for record in records {
            copies.push(record.try_clone()?);
        }

        self.insert_n_mv(index, copies)
            .map_err(MoveError::into_error)
    }

    /// Append a copy of `record`.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        self.insert(usize::MAX, record)
    }

    /// Append copies of `records`.
    pub fn append_n(&mut self, records: &[Record]) -> Result<()> {
        self.insert_n(usize::MAX, records)
    }

    // --- Moving insertion ---

    /// Move `record` into the store at `index` (clamped to the length).
    ///
    /// The store owns the record only if this succeeds; otherwise it is
    /// handed back in the error.
    pub fn insert_mv(
        &mut self,
        index: usize,
        mut record: Record,
    ) -> std::result::Result<(), MoveError<Record>> {
        if let Err(e) = self.records.try_reserve(1) {
            return Err(MoveError {
                source: e.into(),
                rejected: record,
            });
        }

        self.invalidate_raw();
        let index = index.min(self.records.len());
        record.raw_span = None;
        self.records.insert(index, record);
        Ok(())
    }

    /// Move `records` into the store at `index`, keeping their order.
    pub fn insert_n_mv(
        &mut self,
        index: usize,
        records: Vec<Record>,
    ) -> std::result::Result<(), MoveError<Vec<Record>>> {
        if let Err(e) = self.records.try_reserve(records.len()) {
            return Err(MoveError {
                source: e.into(),
                rejected: records,
            });
        }

        self.invalidate_raw();
        let index = index.min(self.records.len());
        // Capacity is reserved, so the tail shift cannot reallocate.
        self.records.splice(
            index..index,
            records.into_iter().map(|mut record| {
                record.raw_span = None;
                record
            }),
        );
        Ok(())
    }

    /// Move `record` to the end of the message.
    pub fn append_mv(&mut self, record: Record) -> std::result::Result<(), MoveError<Record>> {
        self.insert_mv(usize::MAX, record)
    }

    /// Move `records` to the end of the message.
    pub fn append_n_mv(
        &mut self,
        records: Vec<Record>,
    ) -> std::result::Result<(), MoveError<Vec<Record>>> {
        self.insert_n_mv(usize::MAX, records)
    }

    // --- Removal ---

    /// Remove the record at `index`, if any.
    pub fn splice(&mut self, index: usize) -> Option<Record> {
        self.splice_n(index, 1).pop()
    }

    /// Remove up to `count` records starting at `index`.
    ///
    /// The removed records are returned; dropping them releases their
    /// buffers.
    pub fn splice_n(&mut self, index: usize, count: usize) -> Vec<Record> {
        let start = index.min(self.records.len());
        let end = start.saturating_add(count).min(self.records.len());
        if start == end {
            return Vec::new();
        }

        self.invalidate_raw();
        self.records.drain(start..end).collect()
    }

    // --- Codec ---

    /// Serialize the message, refreshing the raw cache.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        crate::message::encode(self)
    }
}

impl Index<usize> for RecordStore {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .map(|mut record| {
                    record.raw_span = None;
                    record
                })
                .collect(),
            raw: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
