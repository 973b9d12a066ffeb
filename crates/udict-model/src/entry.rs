use bytes::Bytes;
use udict_wire::{decode, encode_field, Field, WireType};

use crate::error::ModelResult;
use crate::schema::entry;

/// A serialized entry, carried as opaque bytes.
///
/// Only the key is ever read back out; every other field in an existing
/// entry passes through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryBlob(Bytes);

impl EntryBlob {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// The entry's key, if its first key field decodes as UTF-8.
    ///
    /// The whole blob is decoded, so a malformed entry is an error even when
    /// a usable key precedes the damage. `Ok(None)` means the entry has no
    /// length-delimited key field or its key is not valid UTF-8.
    pub fn key(&self) -> ModelResult<Option<String>> {
        let fields = decode(&self.0)?;
        let key = fields
            .iter()
            .find(|f| f.is(entry::KEY, WireType::LengthDelimited))
            .and_then(Field::as_bytes)
            .and_then(|b| std::str::from_utf8(b).ok())
            .map(str::to_owned);
        Ok(key)
    }
}

/// Encode a fresh entry: key, value, comment, then part-of-speech.
pub fn build_entry(key: &str, value: &str, comment: &str, pos: u64) -> ModelResult<EntryBlob> {
    let fields = [
        Field::length_delimited(entry::KEY, Bytes::copy_from_slice(key.as_bytes())),
        Field::length_delimited(entry::VALUE, Bytes::copy_from_slice(value.as_bytes())),
        Field::length_delimited(entry::COMMENT, Bytes::copy_from_slice(comment.as_bytes())),
        Field::varint(entry::POS, pos),
    ];
    let mut buf = Vec::new();
    for field in &fields {
        encode_field(&mut buf, field)?;
    }
    Ok(EntryBlob::from_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use udict_wire::WireError;

    #[test]
    fn build_entry_field_order() {
        let blob = build_entry("きょう", "10/19(月)", "", 1).unwrap();
        let fields = decode(blob.as_bytes()).unwrap();
        let numbers: Vec<u64> = fields.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![entry::KEY, entry::VALUE, entry::COMMENT, entry::POS]);
        assert_eq!(&fields[1].as_bytes().unwrap()[..], "10/19(月)".as_bytes());
        assert_eq!(fields[2].as_bytes().unwrap().len(), 0);
        assert_eq!(fields[3].as_u64(), Some(1));
    }

    #[test]
    fn build_entry_exact_bytes() {
        let blob = build_entry("a", "b", "", 1).unwrap();
        assert_eq!(
            &blob.as_bytes()[..],
            &[0x0A, 0x01, b'a', 0x12, 0x01, b'b', 0x22, 0x00, 0x28, 0x01]
        );
    }

    #[test]
    fn key_of_built_entry() {
        let blob = build_entry("あした", "x", "note", 3).unwrap();
        assert_eq!(blob.key().unwrap().as_deref(), Some("あした"));
    }

    #[test]
    fn key_after_unknown_fields() {
        // field 10 varint, then key
        let blob = EntryBlob::from_bytes(vec![0x50, 0x01, 0x0A, 0x01, b'k']);
        assert_eq!(blob.key().unwrap().as_deref(), Some("k"));
    }

    #[test]
    fn missing_key_is_none() {
        let blob = EntryBlob::from_bytes(vec![0x12, 0x01, b'v']);
        assert_eq!(blob.key().unwrap(), None);
    }

    #[test]
    fn invalid_utf8_key_is_none() {
        let blob = EntryBlob::from_bytes(vec![0x0A, 0x02, 0xFF, 0xFE]);
        assert_eq!(blob.key().unwrap(), None);
    }

    #[test]
    fn key_with_wrong_wire_type_is_ignored() {
        // field 1 as varint does not count as a key
        let blob = EntryBlob::from_bytes(vec![0x08, 0x05]);
        assert_eq!(blob.key().unwrap(), None);
    }

    #[test]
    fn truncated_field_after_key_is_an_error() {
        // key "k", then field 3 claiming 9 bytes that are not there
        let blob = EntryBlob::from_bytes(vec![0x0A, 0x01, b'k', 0x1A, 0x09]);
        assert!(matches!(
            blob.key(),
            Err(ModelError::Wire(WireError::TruncatedInput { .. }))
        ));
    }

    #[test]
    fn malformed_blob_is_an_error() {
        let blob = EntryBlob::from_bytes(vec![0x12, 0x09, b'v']);
        assert!(matches!(
            blob.key(),
            Err(ModelError::Wire(WireError::TruncatedInput { .. }))
        ));
    }
}
