//! Core types for NDEF records.

use crate::error::Result;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask for the TNF bits of the flag byte.
pub const TNF_MASK: u8 = 0x07;

/// Largest type or ID field the wire format can describe.
pub const MAX_SHORT_FIELD: usize = u8::MAX as usize;

/// Largest payload the wire format can describe.
pub const MAX_PAYLOAD: usize = u32::MAX as usize;

/// Type name format of a record.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tnf {
    #[default]
    Empty = 0x00,
    /// NFC Forum well-known type (`U`, `T`, `Sp`, ...).
    WellKnown = 0x01,
    Mime = 0x02,
    Uri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    /// Continuation chunk of a chunked record.
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    /// Map the low three bits of a flag byte to a TNF.
    pub fn from_bits(bits: u8) -> Self {
        match bits & TNF_MASK {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::Mime,
            0x03 => Tnf::Uri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Human-readable name, e.g. `WELL_KNOWN (1)`.
    pub fn name(self) -> &'static str {
        match self {
            Tnf::Empty => "EMPTY (0)",
            Tnf::WellKnown => "WELL_KNOWN (1)",
            Tnf::Mime => "MIME (2)",
            Tnf::Uri => "URI (3)",
            Tnf::External => "EXTERNAL (4)",
            Tnf::Unknown => "UNKNOWN (5)",
            Tnf::Unchanged => "UNCHANGED (6)",
            Tnf::Reserved => "Reserved (7)",
        }
    }
}

impl fmt::Display for Tnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Encoding flags of a raw record (high five bits of the flag byte).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RecordFlags: u8 {
        /// Message begin.
        const BEGIN = 0x80;
        /// Message end.
        const END = 0x40;
        /// Payload continues in the next record.
        const CHUNKED = 0x20;
        /// Payload length is a single byte.
        const SHORT_RECORD = 0x10;
        /// An ID length byte follows the payload length.
        const ID_LENGTH = 0x08;
    }
}

/// Range of raw records an abstract record was assembled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSpan {
    pub index: usize,
    pub len: usize,
}

/// Byte fields shared by abstract and raw records.
pub trait RecordFields {
    fn tnf(&self) -> Tnf;

    fn record_type(&self) -> &[u8];

    fn payload(&self) -> &[u8];

    /// The ID field, `None` when absent or empty.
    fn id(&self) -> Option<&[u8]>;

    /// Whether the record carries no type, payload or ID at all.
    fn is_blank(&self) -> bool {
        self.record_type().is_empty() && self.payload().is_empty() && self.id().is_none()
    }
}

/// A logical NDEF record, independent of wire flags.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Type name format.
    pub tnf: Tnf,

    /// Type field; meaning depends on `tnf`.
    pub record_type: Vec<u8>,

    /// Application payload.
    pub payload: Vec<u8>,

    /// Optional ID field.
    pub id: Option<Vec<u8>>,

    /// Raw records this one was built from (cleared with the raw cache).
    #[serde(skip)]
    pub raw_span: Option<RawSpan>,
}

impl Record {
    /// Create a record without an ID.
    pub fn new(tnf: Tnf, record_type: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tnf,
            record_type: record_type.into(),
            payload: payload.into(),
            id: None,
            raw_span: None,
        }
    }

    /// Create a well-known record (`U`, `T`, `Sp`, ...).
    pub fn well_known(record_type: &[u8], payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Tnf::WellKnown, record_type, payload)
    }

    /// Set the ID field. An empty ID is stored as no ID.
    pub fn with_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// Deep copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            tnf: self.tnf,
            record_type: try_copy(&self.record_type)?,
            payload: try_copy(&self.payload)?,
            id: self.id.as_deref().map(try_copy).transpose()?,
            raw_span: self.raw_span,
        })
    }
}

impl RecordFields for Record {
    fn tnf(&self) -> Tnf {
        self.tnf
    }

    fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn id(&self) -> Option<&[u8]> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Equality compares logical content; `raw_span` is ignored.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.tnf == other.tnf
            && self.record_type == other.record_type
            && self.payload == other.payload
            && RecordFields::id(self) == RecordFields::id(other)
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("tnf", &self.tnf)
            .field("type", &hex::encode(&self.record_type))
            .field("payload", &hex::encode(&self.payload))
            .field("id", &self.id.as_ref().map(hex::encode))
            .field("raw_span", &self.raw_span)
            .finish()
    }
}

/// A record as it appears on the wire, with its encoding flags.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub flags: RecordFlags,
    pub tnf: Tnf,
    pub record_type: Vec<u8>,
    pub payload: Vec<u8>,
    pub id: Option<Vec<u8>>,

    /// Abstract record this raw record was promoted into.
    pub abs_index: Option<usize>,
}

impl RawRecord {
    /// Derive a single, unchunked raw record from an abstract one.
    ///
    /// Begin/end are left clear; the message encoder sets them.
    pub fn from_record(record: &Record) -> Result<Self> {
        let id = RecordFields::id(record).map(try_copy).transpose()?;
        let mut flags = RecordFlags::empty();
        flags.set(RecordFlags::SHORT_RECORD, record.payload.len() <= MAX_SHORT_FIELD);
        flags.set(RecordFlags::ID_LENGTH, id.is_some());

        Ok(Self {
            flags,
            tnf: record.tnf,
            record_type: try_copy(&record.record_type)?,
            payload: try_copy(&record.payload)?,
            id,
            abs_index: None,
        })
    }

    pub fn is_begin(&self) -> bool {
        self.flags.contains(RecordFlags::BEGIN)
    }

    pub fn is_end(&self) -> bool {
        self.flags.contains(RecordFlags::END)
    }

    pub fn is_chunked(&self) -> bool {
        self.flags.contains(RecordFlags::CHUNKED)
    }

    pub fn is_short(&self) -> bool {
        self.flags.contains(RecordFlags::SHORT_RECORD)
    }

    pub fn has_id_length(&self) -> bool {
        self.flags.contains(RecordFlags::ID_LENGTH)
    }

    /// The flag byte as written on the wire.
    pub fn flag_byte(&self) -> u8 {
        self.flags.bits() | self.tnf.bits()
    }
}

impl RecordFields for RawRecord {
    fn tnf(&self) -> Tnf {
        self.tnf
    }

    fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn id(&self) -> Option<&[u8]> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRecord")
            .field("flags", &self.flags)
            .field("tnf", &self.tnf)
            .field("type", &hex::encode(&self.record_type))
            .field("payload_len", &self.payload.len())
            .field("id", &self.id.as_ref().map(hex::encode))
            .field("abs_index", &self.abs_index)
            .finish()
    }
}

/// Copy a byte slice into a fresh buffer, reporting allocation failure.
pub(crate) fn try_copy(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(out)
}
