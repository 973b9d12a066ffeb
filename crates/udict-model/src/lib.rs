//! Typed views over the user dictionary storage format.
//!
//! Three nesting levels sit on top of the schema-free codec in `udict-wire`:
//!
//! - [`Storage`]: the file: dictionaries plus unrecognized top-level fields
//! - [`Dictionary`]: id, name, serialized entries, unrecognized fields
//! - [`EntryBlob`]: one entry, kept as bytes; only its key is ever read
//!
//! Unrecognized fields at every level are carried verbatim so that a parse
//! followed by a rebuild loses nothing.

pub mod dictionary;
pub mod entry;
pub mod error;
pub mod identity;
pub mod schema;
pub mod storage;

pub use dictionary::Dictionary;
pub use entry::{build_entry, EntryBlob};
pub use error::{ModelError, ModelResult};
pub use identity::{allocate_dictionary_id, allocate_dictionary_id_with};
pub use storage::Storage;
