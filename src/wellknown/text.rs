//! Text records (well-known type `T`).

use crate::error::{NdefError, Result};
use crate::types::{try_copy, Record, RecordFields, Tnf};
use serde::{Deserialize, Serialize};

/// Type field of a text record.
pub const TEXT_TYPE: &[u8] = b"T";

/// Status byte bit marking UTF-16 content.
const STATUS_UTF16: u8 = 0x80;

/// Status byte bits holding the language tag length.
const STATUS_LANG_LEN: u8 = 0x3F;

/// Text with its IANA language tag.
///
/// UTF-16 content is not converted; it is kept as the raw payload bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub language: String,
    pub content: Vec<u8>,
    pub utf16: bool,
}

impl Text {
    /// UTF-8 text in `language`.
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            content: text.into().into_bytes(),
            utf16: false,
        }
    }

    /// The text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        if self.utf16 {
            None
        } else {
            std::str::from_utf8(&self.content).ok()
        }
    }
}

/// Whether `record` is a text record.
pub fn is_text(record: &impl RecordFields) -> bool {
    record.tnf() == Tnf::WellKnown && record.record_type() == TEXT_TYPE && record.payload().len() >= 4
}

/// Split a text record into language and content.
///
/// Returns `Ok(None)` for records that are not text records.
pub fn get_text(record: &impl RecordFields) -> Result<Option<Text>> {
    if !is_text(record) {
        return Ok(None);
    }

    let payload = record.payload();
    let status = payload[0];
    let lang_len = usize::from(status & STATUS_LANG_LEN);
    if 1 + lang_len > payload.len() {
        return Err(NdefError::Malformed(format!(
            "language tag of {} bytes in a {} byte text payload",
            lang_len,
            payload.len()
        )));
    }

    let language = std::str::from_utf8(&payload[1..1 + lang_len])
        .map_err(|_| NdefError::InvalidUtf8("language tag"))?;

    Ok(Some(Text {
        language: language.to_owned(),
        content: try_copy(&payload[1 + lang_len..])?,
        utf16: status & STATUS_UTF16 != 0,
    }))
}

/// Build a text record.
///
/// The language tag must be 2 to 63 bytes and the text non-empty.
pub fn new_text(text: &Text) -> Result<Record> {
    let lang_len = text.language.len();
    if lang_len < 2 {
        return Err(NdefError::InvalidText(format!(
            "language tag {:?} is shorter than 2 bytes",
            text.language
        )));
    }
    if lang_len > usize::from(STATUS_LANG_LEN) {
        return Err(NdefError::InvalidText(format!(
            "language tag is {} bytes (max {})",
            lang_len, STATUS_LANG_LEN
        )));
    }
    if text.content.is_empty() {
        return Err(NdefError::InvalidText("text is empty".into()));
    }

    let mut status = lang_len as u8;
    if text.utf16 {
        status |= STATUS_UTF16;
    }

    let mut payload = Vec::new();
    payload.try_reserve_exact(1 + lang_len + text.content.len())?;
    payload.push(status);
    payload.extend_from_slice(text.language.as_bytes());
    payload.extend_from_slice(&text.content);

    Ok(Record::well_known(TEXT_TYPE, payload))
}
