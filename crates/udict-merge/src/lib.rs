//! Merge engine for user dictionary storage.
//!
//! Applies one keyed update to a decoded [`udict_model::Storage`]: entries
//! for the requested keys are replaced, new keys appended, and the target
//! dictionary created if missing. Everything the update does not touch is
//! re-encoded byte for byte. [`update_dictionary`] is the whole pipeline from
//! old buffer to new buffer.

pub mod engine;
pub mod error;
pub mod request;

pub use engine::{merge, update_dictionary, MergeSummary};
pub use error::{MergeError, MergeResult};
pub use request::{KeyValues, UpdateRequest};
