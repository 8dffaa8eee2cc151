//! Error types for the NDEF codec.

use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Main error type for codec and store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NdefError {
    #[error("Truncated input: need {needed} bytes, have {available}")]
    TruncatedInput { needed: usize, available: usize },

    #[error("Out of memory")]
    OutOfMemory,

    #[error("Invalid URI abbreviation index: {0}")]
    InvalidAbbreviationIndex(u8),

    #[error("Short record flag set but payload is {0} bytes")]
    ShortRecordOverflow(usize),

    #[error("Record has an ID but the ID length flag is clear")]
    MissingIdLength,

    #[error("Field {field} too long: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid text record: {0}")]
    InvalidText(String),

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Smart poster needs a message, a URI or a text")]
    EmptySmartPoster,

    #[error("Smart poster nesting exceeds depth {0}")]
    NestingTooDeep(usize),
}

impl From<TryReserveError> for NdefError {
    fn from(_: TryReserveError) -> Self {
        NdefError::OutOfMemory
    }
}

/// Result type for codec and store operations.
pub type Result<T> = std::result::Result<T, NdefError>;

/// Failure of a move-insertion.
///
/// The store only takes ownership on success, so the records come back
/// to the caller here.
#[derive(Debug, Error)]
#[error("move insertion failed: {source}")]
pub struct MoveError<T: fmt::Debug> {
    #[source]
    pub source: NdefError,
    pub rejected: T,
}

impl<T: fmt::Debug> MoveError<T> {
    /// Drop the rejected records and keep the cause.
    pub fn into_error(self) -> NdefError {
        self.source
    }
}

impl<T: fmt::Debug> From<MoveError<T>> for NdefError {
    fn from(e: MoveError<T>) -> Self {
        e.source
    }
}
