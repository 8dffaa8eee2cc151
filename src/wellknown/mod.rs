//! NFC Forum well-known record types.
//!
//! Each type has an `is_*` predicate that only inspects the TNF, type and
//! payload length, a `get_*` that builds an owned view (`Ok(None)` when the
//! record is of another type), and a `new_*` constructor.
//!
//! # Example
//!
//! ```
//! use ndef_store::wellknown::{get_smartposter, new_smartposter};
//!
//! let record = new_smartposter(None, Some("tel:123"), None).unwrap();
//! let poster = get_smartposter(&record).unwrap().unwrap();
//! assert_eq!(poster.uri.as_deref(), Some("tel:123"));
//! assert!(poster.text.is_none());
//! ```

pub mod smartposter;
pub mod text;
pub mod uri;

pub use smartposter::{
    get_smartposter, get_smartposter_with, is_smartposter, new_smartposter, SmartPoster,
    SMART_POSTER_TYPE,
};
pub use text::{get_text, is_text, new_text, Text, TEXT_TYPE};
pub use uri::{get_uri, is_uri, new_raw_uri, new_uri, ABBREVIATIONS, URI_TYPE};
