//! # NDEF Store
//!
//! An encoder and decoder for NDEF messages, the record format used by
//! NFC tags.
//!
//! ## Core Concepts
//!
//! - **Records**: Logical units with a type name format, type, payload and
//!   optional ID
//! - **Raw records**: The same records as they appear on the wire, with
//!   begin/end/chunk/short/ID-length flags
//! - **Store**: An ordered message holding both, cross-indexed
//! - **Well-known types**: URI, text and smart poster views over records
//!
//! ## Example
//!
//! ```
//! use ndef_store::{decode, wellknown, RecordStore};
//!
//! let mut store = RecordStore::new();
//! store.append_mv(wellknown::new_uri("https://www.example.com")).unwrap();
//!
//! let bytes = store.encode().unwrap();
//! let decoded = decode(&bytes);
//! assert!(decoded.is_complete());
//!
//! let uri = wellknown::get_uri(&decoded.store[0]).unwrap();
//! assert_eq!(uri.as_deref(), Some("https://www.example.com"));
//! ```

pub mod error;
pub mod message;
pub mod records;
pub mod store;
pub mod types;
pub mod wellknown;

// Re-exports
pub use error::{MoveError, NdefError, Result};
pub use message::{decode, decode_with, encode, CodecConfig, Decoded};
pub use records::{decode_record, encode_record, ByteSink};
pub use store::RecordStore;
pub use types::*;
