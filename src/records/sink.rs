//! Growable output buffer for the encoder.

use crate::error::Result;
use bytes::BufMut;

/// Append-only byte buffer with fallible growth and rollback.
///
/// Writers call [`ByteSink::reserve`] for the full size of what they are
/// about to append, then write without further checks.
#[derive(Debug, Default)]
pub struct ByteSink {
    buf: Vec<u8>,
}

impl ByteSink {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Make room for `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buf.try_reserve(additional)?;
        Ok(())
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Big-endian, as all NDEF length fields are.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn put_slice(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Current length, usable as a rollback mark.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop everything appended after `mark`.
    pub fn rollback(&mut self, mark: usize) {
        self.buf.truncate(mark);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
