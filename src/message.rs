//! Whole-message encoding and decoding.
//!
//! Decoding parses raw records until the input runs out or a record fails
//! to parse, then promotes the raw records into abstract ones. It never
//! fails outright: whatever was decoded before a bad record is kept and
//! the result is flagged as partial.

use crate::error::{NdefError, Result};
use crate::records::{decode_record, encode_record, ByteSink};
use crate::store::RecordStore;
use crate::types::{try_copy, RawRecord, RawSpan, Record, RecordFlags, Tnf};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Codec configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Join chunked raw records into one abstract record.
    pub reassemble_chunks: bool,

    /// How many smart posters may nest inside each other.
    pub max_nesting_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            reassemble_chunks: true,
            max_nesting_depth: 8,
        }
    }
}

/// Result of decoding a byte stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Everything that decoded successfully.
    pub store: RecordStore,

    /// Bytes consumed by successfully parsed raw records.
    pub consumed: usize,

    /// Whether decoding stopped early.
    pub partial: bool,
}

impl Decoded {
    pub fn is_complete(&self) -> bool {
        !self.partial
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }
}

/// Decode an NDEF message with the default configuration.
pub fn decode(data: &[u8]) -> Decoded {
    decode_with(data, &CodecConfig::default())
}

/// Decode an NDEF message.
pub fn decode_with(data: &[u8], config: &CodecConfig) -> Decoded {
    let mut store = RecordStore::new();
    let mut pos = 0;
    let mut partial = false;

    while pos < data.len() {
        let (raw, used) = match decode_record(&data[pos..]) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(offset = pos, error = %e, "record decode failed");
                partial = true;
                break;
            }
        };

        if let Err(e) = store.raw.try_reserve(1) {
            debug!(offset = pos, error = %NdefError::from(e), "cannot grow raw records");
            partial = true;
            break;
        }
        store.raw.push(raw);
        pos += used;
    }

    match promote(&mut store, config) {
        Ok(complete) => partial |= !complete,
        Err(e) => {
            debug!(error = %e, "raw record promotion stopped");
            partial = true;
        }
    }

    if partial {
        warn!(
            consumed = pos,
            total = data.len(),
            records = store.len(),
            "decoding is partial"
        );
    }

    Decoded {
        store,
        consumed: pos,
        partial,
    }
}

/// Turn raw records into abstract records.
///
/// A chunk run that cannot be reassembled is promoted record by record
/// and `Ok(false)` is returned. Only allocation failure stops promotion.
fn promote(store: &mut RecordStore, config: &CodecConfig) -> Result<bool> {
    let mut start = 0;
    let mut complete = true;

    while start < store.raw.len() {
        let len = if config.reassemble_chunks && store.raw[start].is_chunked() {
            match chunk_run_len(&store.raw[start..]) {
                Ok(len) => len,
                Err(e) => {
                    warn!(index = start, error = %e, "chunk run broken, promoting record alone");
                    complete = false;
                    1
                }
            }
        } else {
            1
        };
        let span = &store.raw[start..start + len];

        let mut record = assemble(span)?;
        store.records.try_reserve(1)?;

        let abs_index = store.records.len();
        for raw in &mut store.raw[start..start + len] {
            raw.abs_index = Some(abs_index);
        }
        record.raw_span = Some(RawSpan { index: start, len });
        store.records.push(record);

        start += len;
    }

    Ok(complete)
}

/// Length of the chunk run starting at `raws[0]`, including the
/// terminating unchunked record.
fn chunk_run_len(raws: &[RawRecord]) -> Result<usize> {
    for (offset, raw) in raws.iter().enumerate().skip(1) {
        if raw.tnf != Tnf::Unchanged || !raw.record_type.is_empty() {
            return Err(NdefError::Malformed(format!(
                "chunk continuation has TNF {} and {} type bytes",
                raw.tnf,
                raw.record_type.len()
            )));
        }
        if !raw.is_chunked() {
            return Ok(offset + 1);
        }
    }

    Err(NdefError::Malformed(format!(
        "chunked record not terminated after {} chunks",
        raws.len()
    )))
}

/// Build one abstract record from a run of raw records.
fn assemble(span: &[RawRecord]) -> Result<Record> {
    let first = &span[0];

    let payload = if span.len() == 1 {
        try_copy(&first.payload)?
    } else {
        let total = span.iter().map(|raw| raw.payload.len()).sum();
        let mut payload = Vec::new();
        payload.try_reserve_exact(total)?;
        for raw in span {
            payload.extend_from_slice(&raw.payload);
        }
        payload
    };

    Ok(Record {
        tnf: first.tnf,
        record_type: try_copy(&first.record_type)?,
        payload,
        id: first.id.as_deref().map(try_copy).transpose()?,
        raw_span: None,
    })
}

/// Serialize every abstract record of `store`.
///
/// The raw cache is rebuilt from scratch; on failure it is left empty and
/// no bytes are returned.
pub fn encode(store: &mut RecordStore) -> Result<Vec<u8>> {
    store.raw_clear();

    let count = store.records.len();
    let mut raws = Vec::new();
    raws.try_reserve_exact(count)?;
    let mut sink = ByteSink::new();

    for (index, record) in store.records.iter().enumerate() {
        let mut raw = RawRecord::from_record(record)?;
        raw.flags.set(RecordFlags::BEGIN, index == 0);
        raw.flags.set(RecordFlags::END, index + 1 == count);
        raw.abs_index = Some(index);

        if let Err(e) = encode_record(&mut sink, &raw) {
            debug!(index, error = %e, "record encode failed");
            return Err(e);
        }
        trace!(index, len = sink.len(), "encoded record");
        raws.push(raw);
    }

    for (index, record) in store.records.iter_mut().enumerate() {
        record.raw_span = Some(RawSpan { index, len: 1 });
    }
    store.raw = raws;

    Ok(sink.into_inner())
}
