//! Binary layout of a single NDEF record.
//!
//! ```text
//! +---------------------------+
//! | MB ME CF SR IL | TNF (3)  |  flag byte
//! +---------------------------+
//! | type length (u8)          |
//! +---------------------------+
//! | payload length            |  u8 if SR, else u32 big-endian
//! +---------------------------+
//! | id length (u8)            |  only if IL
//! +---------------------------+
//! | type | payload | id       |
//! +---------------------------+
//! ```

use crate::error::{NdefError, Result};
use crate::records::sink::ByteSink;
use crate::types::{
    try_copy, RawRecord, RecordFields, RecordFlags, Tnf, MAX_PAYLOAD, MAX_SHORT_FIELD,
};
use bytes::Buf;

/// Smallest possible record: flags, type length, short payload length.
pub const MIN_RECORD_LEN: usize = 3;

/// Size of the fixed fields for a given flag set.
fn header_len(flags: RecordFlags) -> usize {
    let payload_len_field = if flags.contains(RecordFlags::SHORT_RECORD) { 1 } else { 4 };
    let id_len_field = usize::from(flags.contains(RecordFlags::ID_LENGTH));
    2 + payload_len_field + id_len_field
}

/// Decode one raw record from the start of `data`.
///
/// Returns the record and the number of bytes it occupied. On error
/// nothing is consumed.
pub fn decode_record(data: &[u8]) -> Result<(RawRecord, usize)> {
    let available = data.len();
    if available < MIN_RECORD_LEN {
        return Err(NdefError::TruncatedInput {
            needed: MIN_RECORD_LEN,
            available,
        });
    }

    let mut buf = data;
    let flag_byte = buf.get_u8();
    let flags = RecordFlags::from_bits_truncate(flag_byte);
    let tnf = Tnf::from_bits(flag_byte);

    let fixed = header_len(flags);
    if available < fixed {
        return Err(NdefError::TruncatedInput {
            needed: fixed,
            available,
        });
    }

    let type_len = usize::from(buf.get_u8());
    let payload_len = if flags.contains(RecordFlags::SHORT_RECORD) {
        usize::from(buf.get_u8())
    } else {
        buf.get_u32() as usize
    };
    let id_len = if flags.contains(RecordFlags::ID_LENGTH) {
        usize::from(buf.get_u8())
    } else {
        0
    };

    let needed = fixed
        .saturating_add(type_len)
        .saturating_add(payload_len)
        .saturating_add(id_len);
    if available < needed {
        return Err(NdefError::TruncatedInput { needed, available });
    }

    let record_type = try_copy(&buf[..type_len])?;
    buf.advance(type_len);
    let payload = try_copy(&buf[..payload_len])?;
    buf.advance(payload_len);
    let id = if id_len > 0 {
        Some(try_copy(&buf[..id_len])?)
    } else {
        None
    };

    Ok((
        RawRecord {
            flags,
            tnf,
            record_type,
            payload,
            id,
            abs_index: None,
        },
        needed,
    ))
}

/// Check that `record` can be written exactly as its flags describe.
fn validate(record: &RawRecord) -> Result<()> {
    let type_len = record.record_type.len();
    if type_len > MAX_SHORT_FIELD {
        return Err(NdefError::FieldTooLong {
            field: "type",
            len: type_len,
            max: MAX_SHORT_FIELD,
        });
    }

    let payload_len = record.payload.len();
    if payload_len > MAX_PAYLOAD {
        return Err(NdefError::FieldTooLong {
            field: "payload",
            len: payload_len,
            max: MAX_PAYLOAD,
        });
    }
    if record.is_short() && payload_len > MAX_SHORT_FIELD {
        return Err(NdefError::ShortRecordOverflow(payload_len));
    }

    if let Some(id) = RecordFields::id(record) {
        if !record.has_id_length() {
            return Err(NdefError::MissingIdLength);
        }
        if id.len() > MAX_SHORT_FIELD {
            return Err(NdefError::FieldTooLong {
                field: "id",
                len: id.len(),
                max: MAX_SHORT_FIELD,
            });
        }
    }

    Ok(())
}

/// Number of bytes `record` occupies on the wire.
pub fn encoded_len(record: &RawRecord) -> usize {
    let id_len = RecordFields::id(record).map_or(0, <[u8]>::len);
    header_len(record.flags) + record.record_type.len() + record.payload.len() + id_len
}

/// Append one raw record to `sink`.
///
/// The record is validated first and the space reserved up front, so a
/// failure leaves `sink` as it was.
pub fn encode_record(sink: &mut ByteSink, record: &RawRecord) -> Result<()> {
    validate(record)?;
    sink.reserve(encoded_len(record))?;

    let id = RecordFields::id(record);

    sink.put_u8(record.flag_byte());
    sink.put_u8(record.record_type.len() as u8);
    if record.is_short() {
        sink.put_u8(record.payload.len() as u8);
    } else {
        sink.put_u32(record.payload.len() as u32);
    }
    if record.has_id_length() {
        sink.put_u8(id.map_or(0, |id| id.len() as u8));
    }

    sink.put_slice(&record.record_type);
    sink.put_slice(&record.payload);
    if let Some(id) = id {
        sink.put_slice(id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(flags: RecordFlags, tnf: Tnf, record_type: &[u8], payload: &[u8]) -> RawRecord {
        RawRecord {
            flags,
            tnf,
            record_type: record_type.to_vec(),
            payload: payload.to_vec(),
            id: None,
            abs_index: None,
        }
    }

    #[test]
    fn test_decode_short_record() {
        // MB ME SR, well-known "U", payload 0x01 "a.b"
        let data = [0xD1, 0x01, 0x04, b'U', 0x01, b'a', b'.', b'b', 0xFF];
        let (record, used) = decode_record(&data).unwrap();

        assert_eq!(used, 8);
        assert!(record.is_begin());
        assert!(record.is_end());
        assert!(record.is_short());
        assert!(!record.is_chunked());
        assert_eq!(record.tnf, Tnf::WellKnown);
        assert_eq!(record.record_type, b"U");
        assert_eq!(record.payload, [0x01, b'a', b'.', b'b']);
        assert!(record.id.is_none());
    }

    #[test]
    fn test_decode_long_record_with_id() {
        let mut data = vec![0x80 | 0x08 | 0x02, 0x03, 0x00, 0x00, 0x01, 0x00, 0x02];
        data.extend_from_slice(b"a/b");
        data.extend(std::iter::repeat(0x5A).take(256));
        data.extend_from_slice(b"id");

        let (record, used) = decode_record(&data).unwrap();
        assert_eq!(used, data.len());
        assert_eq!(record.tnf, Tnf::Mime);
        assert_eq!(record.payload.len(), 256);
        assert_eq!(record.id.as_deref(), Some(&b"id"[..]));
    }

    #[test]
    fn test_decode_truncated_body() {
        let err = decode_record(&[0x90, 0x00, 0x05]).unwrap_err();
        assert_eq!(
            err,
            NdefError::TruncatedInput {
                needed: 8,
                available: 3
            }
        );
    }

    #[test]
    fn test_decode_truncated_long_header() {
        // Not short: needs 6 header bytes.
        let err = decode_record(&[0x80, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, NdefError::TruncatedInput { needed: 6, .. }));
    }

    #[test]
    fn test_decode_too_short() {
        let err = decode_record(&[0xD1, 0x01]).unwrap_err();
        assert!(matches!(err, NdefError::TruncatedInput { needed: 3, available: 2 }));
    }

    #[test]
    fn test_encode_matches_decode_layout() {
        let mut record = raw(
            RecordFlags::BEGIN | RecordFlags::END | RecordFlags::SHORT_RECORD | RecordFlags::ID_LENGTH,
            Tnf::External,
            b"x:y",
            b"data",
        );
        record.id = Some(b"#1".to_vec());

        let mut sink = ByteSink::new();
        encode_record(&mut sink, &record).unwrap();
        let bytes = sink.into_inner();
        assert_eq!(bytes.len(), encoded_len(&record));
        assert_eq!(&bytes[..4], &[0xDC, 0x03, 0x04, 0x02]);

        let (decoded, used) = decode_record(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_long_length_field() {
        let record = raw(RecordFlags::empty(), Tnf::Unknown, b"", &[0u8; 256]);
        let mut sink = ByteSink::new();
        encode_record(&mut sink, &record).unwrap();
        assert_eq!(&sink.as_slice()[..6], &[0x05, 0x00, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_encode_rejects_short_overflow() {
        let record = raw(RecordFlags::SHORT_RECORD, Tnf::Unknown, b"", &[0u8; 300]);
        let mut sink = ByteSink::new();
        sink.put_u8(0xAA);

        let err = encode_record(&mut sink, &record).unwrap_err();
        assert_eq!(err, NdefError::ShortRecordOverflow(300));
        assert_eq!(sink.as_slice(), &[0xAA]);
    }

    #[test]
    fn test_encode_rejects_id_without_flag() {
        let mut record = raw(RecordFlags::SHORT_RECORD, Tnf::Unknown, b"", b"p");
        record.id = Some(b"id".to_vec());
        let mut sink = ByteSink::new();
        assert_eq!(
            encode_record(&mut sink, &record).unwrap_err(),
            NdefError::MissingIdLength
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_encode_rejects_long_type() {
        let record = raw(RecordFlags::SHORT_RECORD, Tnf::Mime, &[b'a'; 256], b"");
        let mut sink = ByteSink::new();
        assert!(matches!(
            encode_record(&mut sink, &record),
            Err(NdefError::FieldTooLong { field: "type", len: 256, .. })
        ));
    }

    #[test]
    fn test_id_length_flag_without_id_writes_zero() {
        let record = raw(
            RecordFlags::SHORT_RECORD | RecordFlags::ID_LENGTH,
            Tnf::Empty,
            b"",
            b"",
        );
        let mut sink = ByteSink::new();
        encode_record(&mut sink, &record).unwrap();
        assert_eq!(sink.as_slice(), &[0x18, 0x00, 0x00, 0x00]);
    }
}
