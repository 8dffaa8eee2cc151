//! Smart poster records (well-known type `Sp`).
//!
//! A smart poster's payload is itself an NDEF message, conventionally
//! holding a URI record and a text record. Nested smart posters are
//! expanded too, up to [`CodecConfig::max_nesting_depth`] levels.

use crate::error::{NdefError, Result};
use crate::message::{decode_with, CodecConfig};
use crate::store::RecordStore;
use crate::types::{Record, RecordFields, Tnf};
use crate::wellknown::text::{get_text, is_text, new_text, Text};
use crate::wellknown::uri::{get_uri, is_uri, new_uri};
use tracing::debug;

/// Type field of a smart poster record.
pub const SMART_POSTER_TYPE: &[u8] = b"Sp";

/// Decoded view of a smart poster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmartPoster {
    /// The nested message.
    pub message: RecordStore,

    /// First URI found in the message.
    pub uri: Option<String>,

    /// First text found in the message.
    pub text: Option<Text>,

    /// Smart posters inside the message, in order.
    pub nested: Vec<SmartPoster>,
}

impl SmartPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_text(mut self, text: Text) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_message(mut self, message: RecordStore) -> Self {
        self.message = message;
        self
    }

    /// Encode into a smart poster record.
    pub fn to_record(&self) -> Result<Record> {
        new_smartposter(Some(&self.message), self.uri.as_deref(), self.text.as_ref())
    }
}

/// Whether `record` is a smart poster record.
pub fn is_smartposter(record: &impl RecordFields) -> bool {
    record.tnf() == Tnf::WellKnown
        && record.record_type() == SMART_POSTER_TYPE
        && !record.payload().is_empty()
}

/// Decode a smart poster with the default configuration.
pub fn get_smartposter(record: &impl RecordFields) -> Result<Option<SmartPoster>> {
    get_smartposter_with(record, &CodecConfig::default())
}

/// Decode a smart poster.
///
/// Returns `Ok(None)` for records that are not smart posters.
pub fn get_smartposter_with(
    record: &impl RecordFields,
    config: &CodecConfig,
) -> Result<Option<SmartPoster>> {
    if !is_smartposter(record) {
        return Ok(None);
    }
    parse(record.payload(), config, config.max_nesting_depth).map(Some)
}

fn parse(payload: &[u8], config: &CodecConfig, depth: usize) -> Result<SmartPoster> {
    if depth == 0 {
        return Err(NdefError::NestingTooDeep(config.max_nesting_depth));
    }

    let decoded = decode_with(payload, config);
    if decoded.partial {
        debug!(
            consumed = decoded.consumed,
            len = payload.len(),
            "smart poster payload decoded partially"
        );
    }
    let message = decoded.store;

    let uri = message.iter().find_map(|record| get_uri(record).ok().flatten());
    let text = message.iter().find_map(|record| get_text(record).ok().flatten());

    let mut nested = Vec::new();
    for record in message.iter().filter(|record| is_smartposter(*record)) {
        nested.push(parse(record.payload(), config, depth - 1)?);
    }

    Ok(SmartPoster {
        message,
        uri,
        text,
        nested,
    })
}

/// Build a smart poster record.
///
/// `message` is copied, then a URI record and a text record are appended
/// if it lacks them and `uri` / `text` are given. At least one of a
/// non-empty message, a URI or a text is required.
pub fn new_smartposter(
    message: Option<&RecordStore>,
    uri: Option<&str>,
    text: Option<&Text>,
) -> Result<Record> {
    let mut inner = message.cloned().unwrap_or_default();
    if inner.is_empty() && uri.is_none() && text.is_none() {
        return Err(NdefError::EmptySmartPoster);
    }

    let has_uri = inner.iter().any(|record| is_uri(record));
    let has_text = inner.iter().any(|record| is_text(record));

    if let Some(uri) = uri.filter(|_| !has_uri) {
        inner.append_mv(new_uri(uri))?;
    }
    if let Some(text) = text.filter(|_| !has_text) {
        inner.append_mv(new_text(text)?)?;
    }

    let payload = inner.encode()?;
    Ok(Record::well_known(SMART_POSTER_TYPE, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_only_poster() {
        let record = new_smartposter(None, Some("tel:123"), None).unwrap();
        assert!(is_smartposter(&record));
        assert_eq!(record.record_type, b"Sp");

        let poster = get_smartposter(&record).unwrap().unwrap();
        assert_eq!(poster.uri.as_deref(), Some("tel:123"));
        assert!(poster.text.is_none());
        assert_eq!(poster.message.len(), 1);
        assert!(poster.nested.is_empty());
    }

    #[test]
    fn test_uri_and_text_poster() {
        let text = Text::new("en", "Call us");
        let record = SmartPoster::new()
            .with_uri("https://example.com")
            .with_text(text.clone())
            .to_record()
            .unwrap();

        let poster = get_smartposter(&record).unwrap().unwrap();
        assert_eq!(poster.uri.as_deref(), Some("https://example.com"));
        assert_eq!(poster.text, Some(text));
        assert!(is_uri(&poster.message[0]));
        assert!(is_text(&poster.message[1]));
    }

    #[test]
    fn test_poster_around_existing_message() {
        let message: RecordStore = vec![
            new_uri("https://example.com/menu"),
            Record::new(Tnf::Mime, "image/png", vec![0x89, b'P', b'N', b'G']),
        ]
        .into_iter()
        .collect();

        let record = SmartPoster::new()
            .with_message(message.clone())
            .with_text(Text::new("en", "Menu"))
            .to_record()
            .unwrap();

        let poster = get_smartposter(&record).unwrap().unwrap();
        assert_eq!(poster.message.len(), 3);
        assert_eq!(poster.message[1], message[1]);
        assert_eq!(poster.uri.as_deref(), Some("https://example.com/menu"));
        assert_eq!(poster.text.unwrap().as_str(), Some("Menu"));
    }

    #[test]
    fn test_existing_records_not_duplicated() {
        let mut inner = RecordStore::new();
        inner.append_mv(new_uri("http://a.example")).unwrap();

        let record = new_smartposter(Some(&inner), Some("http://b.example"), None).unwrap();
        let poster = get_smartposter(&record).unwrap().unwrap();
        assert_eq!(poster.message.len(), 1);
        assert_eq!(poster.uri.as_deref(), Some("http://a.example"));

        // The caller's message is untouched.
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.raw_len(), 0);
    }

    #[test]
    fn test_empty_poster_rejected() {
        assert_eq!(
            new_smartposter(None, None, None).unwrap_err(),
            NdefError::EmptySmartPoster
        );
        assert_eq!(
            new_smartposter(Some(&RecordStore::new()), None, None).unwrap_err(),
            NdefError::EmptySmartPoster
        );
    }

    #[test]
    fn test_invalid_text_propagates() {
        let err = new_smartposter(None, Some("tel:1"), Some(&Text::new("en", ""))).unwrap_err();
        assert!(matches!(err, NdefError::InvalidText(_)));
    }

    #[test]
    fn test_nested_posters() {
        let inner = new_smartposter(None, Some("tel:2"), None).unwrap();
        let mut message = RecordStore::new();
        message.append_mv(inner).unwrap();
        let outer = new_smartposter(Some(&message), Some("tel:1"), None).unwrap();

        let poster = get_smartposter(&outer).unwrap().unwrap();
        assert_eq!(poster.uri.as_deref(), Some("tel:1"));
        assert_eq!(poster.nested.len(), 1);
        assert_eq!(poster.nested[0].uri.as_deref(), Some("tel:2"));
    }

    #[test]
    fn test_nesting_depth_bounded() {
        let mut record = new_smartposter(None, Some("tel:0"), None).unwrap();
        for _ in 0..4 {
            let message: RecordStore = vec![record].into_iter().collect();
            record = new_smartposter(Some(&message), None, None).unwrap();
        }

        let shallow = CodecConfig {
            max_nesting_depth: 3,
            ..Default::default()
        };
        assert_eq!(
            get_smartposter_with(&record, &shallow).unwrap_err(),
            NdefError::NestingTooDeep(3)
        );
        assert!(get_smartposter(&record).unwrap().is_some());
    }

    #[test]
    fn test_not_a_poster() {
        assert!(get_smartposter(&new_uri("tel:1")).unwrap().is_none());
        assert!(!is_smartposter(&Record::well_known(b"Sp", Vec::<u8>::new())));
    }
}
