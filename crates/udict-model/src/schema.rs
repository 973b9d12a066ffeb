//! Field numbers the model recognizes. Everything else is carried opaquely.

/// Top-level storage message.
pub mod storage {
    pub const DICTIONARY: u64 = 2;
}

/// One named dictionary.
pub mod dictionary {
    pub const ID: u64 = 1;
    pub const NAME: u64 = 3;
    pub const ENTRY: u64 = 4;
}

/// One dictionary entry.
pub mod entry {
    pub const KEY: u64 = 1;
    pub const VALUE: u64 = 2;
    pub const COMMENT: u64 = 4;
    pub const POS: u64 = 5;
}
