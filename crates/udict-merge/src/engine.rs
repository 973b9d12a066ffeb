use std::collections::HashSet;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};
use udict_model::{allocate_dictionary_id, Dictionary, EntryBlob, Storage};

use crate::error::MergeResult;
use crate::request::UpdateRequest;

/// What an update did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub dictionary_name: String,
    pub dictionary_id: u64,
    /// True if the dictionary did not exist and was appended.
    pub created: bool,
    pub key_count: usize,
    pub entry_count: usize,
}

/// Apply `request` to `storage`, returning a new storage.
///
/// The first dictionary whose name matches is updated: its entries for the
/// requested keys are dropped and the freshly built entries appended after
/// the survivors. With no match a new dictionary is appended under a fresh
/// id. Every other dictionary and every unknown field is carried over as is.
pub fn merge(storage: &Storage, request: &UpdateRequest) -> MergeResult<(Storage, MergeSummary)> {
    let name = request.dictionary_name.as_str();

    let new_entries = request.build_entries()?;
    let matches = storage.positions_named(name);
    let mut updated = storage.clone();

    let (dictionary_id, created) = match matches.first() {
        None => {
            let id = allocate_dictionary_id(&storage.dictionary_ids());
            debug!(dictionary = name, id, entries = new_entries.len(), "creating dictionary");
            updated
                .dictionaries
                .push(Dictionary::new(id, name, new_entries));
            (id, true)
        }
        Some(&idx) => {
            if matches.len() > 1 {
                warn!(
                    dictionary = name,
                    count = matches.len(),
                    "multiple dictionaries share this name; updating the first"
                );
            }
            let target = &storage.dictionaries[idx];
            let mut entries = retain_unmatched(target, &request.key_set())?;
            let removed = target.entries.len() - entries.len();
            debug!(
                dictionary = name,
                id = target.id,
                removed,
                added = new_entries.len(),
                "replacing entries"
            );
            entries.extend(new_entries);
            updated.dictionaries[idx] = target.with_entries(entries);
            (target.id, false)
        }
    };

    let summary = MergeSummary {
        dictionary_name: name.to_owned(),
        dictionary_id,
        created,
        key_count: request.keys().len(),
        entry_count: request.entry_count(),
    };
    Ok((updated, summary))
}

/// Decode `raw`, apply `request`, and re-encode.
///
/// An empty buffer stands for a storage with no dictionaries. Any decode
/// failure aborts before anything is built.
pub fn update_dictionary(raw: &Bytes, request: &UpdateRequest) -> MergeResult<(Vec<u8>, MergeSummary)> {
    let storage = Storage::parse(raw)?;
    let (updated, summary) = merge(&storage, request)?;
    Ok((updated.to_bytes()?, summary))
}

/// Entries whose key is not being replaced. Keyless entries always survive;
/// an entry that does not decode aborts the update.
fn retain_unmatched(dict: &Dictionary, keys: &HashSet<&str>) -> MergeResult<Vec<EntryBlob>> {
    let mut kept = Vec::with_capacity(dict.entries.len());
    for (index, entry) in dict.entries.iter().enumerate() {
        match entry.key()? {
            Some(key) if keys.contains(key.as_str()) => continue,
            Some(_) => {}
            None => {
                warn!(dictionary = %dict.name, index, "entry has no readable key; keeping it");
            }
        }
        kept.push(entry.clone());
    }
    Ok(kept)
}
