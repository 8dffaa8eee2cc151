//! URI records (well-known type `U`).
//!
//! The first payload byte selects a prefix from [`ABBREVIATIONS`]; the rest
//! of the payload is the remainder of the URI.

use crate::error::{NdefError, Result};
use crate::types::{Record, RecordFields, Tnf};

/// Type field of a URI record.
pub const URI_TYPE: &[u8] = b"U";

/// URI prefixes that can be replaced by their index.
pub static ABBREVIATIONS: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Whether `record` is a URI record.
pub fn is_uri(record: &impl RecordFields) -> bool {
    record.tnf() == Tnf::WellKnown && record.record_type() == URI_TYPE && record.payload().len() >= 2
}

/// Expand a URI record into the full URI.
///
/// Returns `Ok(None)` for records that are not URI records. The stored
/// remainder ends at the payload end or at the first NUL byte.
pub fn get_uri(record: &impl RecordFields) -> Result<Option<String>> {
    if !is_uri(record) {
        return Ok(None);
    }

    let payload = record.payload();
    let prefix = ABBREVIATIONS
        .get(usize::from(payload[0]))
        .ok_or(NdefError::InvalidAbbreviationIndex(payload[0]))?;

    let rest = &payload[1..];
    let rest = match rest.iter().position(|&b| b == 0) {
        Some(end) => &rest[..end],
        None => rest,
    };
    let rest = std::str::from_utf8(rest).map_err(|_| NdefError::InvalidUtf8("URI"))?;

    let mut uri = String::new();
    uri.try_reserve_exact(prefix.len() + rest.len())?;
    uri.push_str(prefix);
    uri.push_str(rest);
    Ok(Some(uri))
}

/// Index and length of the longest table prefix of `uri`.
fn longest_abbreviation(uri: &str) -> (u8, usize) {
    let mut best = (0u8, 0usize);
    for (index, prefix) in ABBREVIATIONS.iter().enumerate().skip(1) {
        if prefix.len() > best.1 && uri.starts_with(prefix) {
            best = (index as u8, prefix.len());
        }
    }
    best
}

fn uri_record(abbreviation: u8, rest: &str) -> Record {
    let mut payload = Vec::with_capacity(rest.len() + 1);
    payload.push(abbreviation);
    payload.extend_from_slice(rest.as_bytes());
    Record::well_known(URI_TYPE, payload)
}

/// Build a URI record, abbreviating the longest known prefix.
///
/// [`get_uri`] reads the remainder only up to the first NUL byte, so a
/// `uri` containing NUL comes back cut at that point.
pub fn new_uri(uri: &str) -> Record {
    let (index, len) = longest_abbreviation(uri);
    uri_record(index, &uri[len..])
}

/// Build a URI record that stores `uri` verbatim.
///
/// The same NUL cut-off as for [`new_uri`] applies when reading it back.
pub fn new_raw_uri(uri: &str) -> Record {
    uri_record(0, uri)
}
