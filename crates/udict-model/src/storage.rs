use std::collections::HashSet;

use bytes::Bytes;
use tracing::debug;
use udict_wire::{decode, encode, Field, WireType};

use crate::dictionary::Dictionary;
use crate::error::ModelResult;
use crate::schema::storage;

/// The whole storage file: dictionaries plus any top-level fields the model
/// does not recognize.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Storage {
    pub dictionaries: Vec<Dictionary>,
    pub unknown_fields: Vec<Field>,
}

impl Storage {
    /// Decode a storage buffer. An empty buffer is an empty storage.
    pub fn parse(buf: &Bytes) -> ModelResult<Self> {
        Self::from_fields(decode(buf)?)
    }

    /// Split decoded top-level fields into dictionaries and unknown fields.
    pub fn from_fields(fields: Vec<Field>) -> ModelResult<Self> {
        let mut dictionaries = Vec::new();
        let mut unknown_fields = Vec::new();

        for field in fields {
            if field.is(storage::DICTIONARY, WireType::LengthDelimited) {
                let payload = field.into_bytes().unwrap_or_default();
                dictionaries.push(Dictionary::parse(&payload)?);
            } else {
                unknown_fields.push(field);
            }
        }

        debug!(
            dictionaries = dictionaries.len(),
            unknown_fields = unknown_fields.len(),
            "parsed storage"
        );
        Ok(Self {
            dictionaries,
            unknown_fields,
        })
    }

    /// Field sequence: every dictionary in order, then unknown fields.
    pub fn to_fields(&self) -> ModelResult<Vec<Field>> {
        let mut fields = Vec::with_capacity(self.dictionaries.len() + self.unknown_fields.len());
        for dict in &self.dictionaries {
            fields.push(Field::length_delimited(storage::DICTIONARY, dict.to_bytes()?));
        }
        fields.extend(self.unknown_fields.iter().cloned());
        Ok(fields)
    }

    /// Serialize the storage.
    pub fn to_bytes(&self) -> ModelResult<Vec<u8>> {
        Ok(encode(&self.to_fields()?)?)
    }

    /// Ids of every dictionary, for collision checks.
    pub fn dictionary_ids(&self) -> HashSet<u64> {
        self.dictionaries.iter().map(|d| d.id).collect()
    }

    /// Indices of dictionaries named `name`, in encounter order.
    pub fn positions_named(&self, name: &str) -> Vec<usize> {
        self.dictionaries
            .iter()
            .enumerate()
            .filter(|(_, d)| d.name == name)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::build_entry;
    use crate::error::ModelError;

    fn sample() -> Storage {
        let mut first = Dictionary::new(11, "first", vec![build_entry("a", "1", "", 1).unwrap()]);
        first.unknown_fields.push(Field::varint(2, 1));
        let second = Dictionary::new(22, "second", vec![]);
        Storage {
            dictionaries: vec![first, second],
            unknown_fields: vec![Field::fixed64(7, [9; 8]), Field::length_delimited(1, &b"v"[..])],
        }
    }

    #[test]
    fn empty_buffer_is_empty_storage() {
        let storage = Storage::parse(&Bytes::new()).unwrap();
        assert_eq!(storage, Storage::default());
        assert!(storage.to_bytes().unwrap().is_empty());
    }

    #[test]
    fn roundtrip_structure_and_bytes() {
        let storage = sample();
        let encoded = storage.to_bytes().unwrap();
        let parsed = Storage::parse(&Bytes::from(encoded.clone())).unwrap();
        assert_eq!(parsed, storage);
        assert_eq!(parsed.to_bytes().unwrap(), encoded);
    }

    #[test]
    fn dictionary_field_with_other_wire_type_is_unknown() {
        // field 2 as varint
        let storage = Storage::parse(&Bytes::from(vec![0x10, 0x03])).unwrap();
        assert!(storage.dictionaries.is_empty());
        assert_eq!(storage.unknown_fields, vec![Field::varint(2, 3)]);
    }

    #[test]
    fn bad_nested_dictionary_fails_whole_parse() {
        // field 2 payload is a dictionary without a name
        let err = Storage::parse(&Bytes::from(vec![0x12, 0x02, 0x08, 0x01])).unwrap_err();
        assert_eq!(err, ModelError::MissingRequiredField { field: "name" });
    }

    #[test]
    fn truncated_storage_fails() {
        let mut encoded = sample().to_bytes().unwrap();
        encoded.truncate(encoded.len() - 1);
        let err = Storage::parse(&Bytes::from(encoded)).unwrap_err();
        assert!(matches!(err, ModelError::Wire(_)));
    }

    #[test]
    fn ids_and_name_lookup() {
        let mut storage = sample();
        storage.dictionaries.push(Dictionary::new(33, "first", vec![]));
        assert_eq!(storage.dictionary_ids(), HashSet::from([11, 22, 33]));
        assert_eq!(storage.positions_named("first"), vec![0, 2]);
        assert!(storage.positions_named("missing").is_empty());
    }
}
