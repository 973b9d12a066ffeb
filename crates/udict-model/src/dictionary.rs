use bytes::Bytes;
use udict_wire::{decode, encode, Field, WireType};

use crate::entry::EntryBlob;
use crate::error::{ModelError, ModelResult};
use crate::schema::dictionary;

/// One named dictionary record.
///
/// `id` and `name` are required. Entries stay serialized; fields the model
/// does not recognize are kept in encounter order and written back after the
/// recognized ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    pub id: u64,
    pub name: String,
    pub entries: Vec<EntryBlob>,
    pub unknown_fields: Vec<Field>,
}

impl Dictionary {
    pub fn new(id: u64, name: impl Into<String>, entries: Vec<EntryBlob>) -> Self {
        Self {
            id,
            name: name.into(),
            entries,
            unknown_fields: Vec::new(),
        }
    }

    /// Decode a dictionary from its serialized payload.
    ///
    /// A repeated id or name field overwrites the earlier one.
    pub fn parse(payload: &Bytes) -> ModelResult<Self> {
        let mut id = None;
        let mut name = None;
        let mut entries = Vec::new();
        let mut unknown_fields = Vec::new();

        for field in decode(payload)? {
            if field.is(dictionary::ID, WireType::Varint) {
                id = field.as_u64();
            } else if field.is(dictionary::NAME, WireType::LengthDelimited) {
                let raw = field.into_bytes().unwrap_or_default();
                let text = std::str::from_utf8(&raw)
                    .map_err(|_| ModelError::InvalidEncoding { field: "name" })?;
                name = Some(text.to_owned());
            } else if field.is(dictionary::ENTRY, WireType::LengthDelimited) {
                entries.push(EntryBlob::from_bytes(field.into_bytes().unwrap_or_default()));
            } else {
                unknown_fields.push(field);
            }
        }

        let id = id.ok_or(ModelError::MissingRequiredField { field: "id" })?;
        let name = name.ok_or(ModelError::MissingRequiredField { field: "name" })?;

        Ok(Self {
            id,
            name,
            entries,
            unknown_fields,
        })
    }

    /// Field sequence for this record: id, name, entries, then unknown fields.
    pub fn to_fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(2 + self.entries.len() + self.unknown_fields.len());
        fields.push(Field::varint(dictionary::ID, self.id));
        fields.push(Field::length_delimited(
            dictionary::NAME,
            Bytes::copy_from_slice(self.name.as_bytes()),
        ));
        fields.extend(
            self.entries
                .iter()
                .map(|e| Field::length_delimited(dictionary::ENTRY, e.as_bytes().clone())),
        );
        fields.extend(self.unknown_fields.iter().cloned());
        fields
    }

    /// Serialize this record.
    pub fn to_bytes(&self) -> ModelResult<Vec<u8>> {
        Ok(encode(&self.to_fields())?)
    }

    /// A copy of this record with its entry list replaced.
    pub fn with_entries(&self, entries: Vec<EntryBlob>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            entries,
            unknown_fields: self.unknown_fields.clone(),
        }
    }
}
