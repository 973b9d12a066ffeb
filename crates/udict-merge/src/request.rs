use std::collections::HashSet;

use udict_model::{build_entry, EntryBlob, ModelResult};

/// Values to write under one key, deduplicated in first-seen order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValues {
    pub key: String,
    pub values: Vec<String>,
}

impl KeyValues {
    fn push_unique(&mut self, value: String) {
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }
}

/// One logical update against a named dictionary.
///
/// Keys keep insertion order. Adding values for a key that is already
/// present extends that key instead of opening a second slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateRequest {
    pub dictionary_name: String,
    pub pos: u64,
    keys: Vec<KeyValues>,
}

impl UpdateRequest {
    pub fn new(dictionary_name: impl Into<String>, pos: u64) -> Self {
        Self {
            dictionary_name: dictionary_name.into(),
            pos,
            keys: Vec::new(),
        }
    }

    /// Builder form of [`add_values`](Self::add_values).
    pub fn with_values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.add_values(key, values);
        self
    }

    pub fn add_values<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        let idx = match self.keys.iter().position(|kv| kv.key == key) {
            Some(idx) => idx,
            None => {
                self.keys.push(KeyValues {
                    key,
                    values: Vec::new(),
                });
                self.keys.len() - 1
            }
        };
        let slot = &mut self.keys[idx];
        for value in values {
            slot.push_unique(value.into());
        }
    }

    pub fn keys(&self) -> &[KeyValues] {
        &self.keys
    }

    pub fn key_set(&self) -> HashSet<&str> {
        self.keys.iter().map(|kv| kv.key.as_str()).collect()
    }

    /// Number of entries [`build_entries`](Self::build_entries) will produce.
    pub fn entry_count(&self) -> usize {
        self.keys.iter().map(|kv| kv.values.len()).sum()
    }

    /// One entry per (key, value), key-major, with an empty comment.
    pub fn build_entries(&self) -> ModelResult<Vec<EntryBlob>> {
        let mut entries = Vec::with_capacity(self.entry_count());
        for kv in &self.keys {
            for value in &kv.values {
                entries.push(build_entry(&kv.key, value, "", self.pos)?);
            }
        }
        Ok(entries)
    }
}
