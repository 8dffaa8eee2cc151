//! Single-record wire codec.
//!
//! Everything that knows the binary layout of one record lives here: the
//! decoder reads straight from the input slice, the encoder appends to a
//! [`ByteSink`].

pub mod codec;
mod sink;

pub use codec::{decode_record, encode_record, encoded_len, MIN_RECORD_LEN};
pub use sink::ByteSink;
