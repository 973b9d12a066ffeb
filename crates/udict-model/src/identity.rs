use std::collections::HashSet;

use rand::rngs::OsRng;
use rand::RngCore;

/// Draw a fresh dictionary id from the OS random source.
///
/// The result is never zero and never in `existing`.
pub fn allocate_dictionary_id(existing: &HashSet<u64>) -> u64 {
    allocate_dictionary_id_with(&mut OsRng, existing)
}

/// Same as [`allocate_dictionary_id`] with a caller-supplied source.
pub fn allocate_dictionary_id_with<R: RngCore + ?Sized>(rng: &mut R, existing: &HashSet<u64>) -> u64 {
    loop {
        let candidate = rng.next_u64();
        if candidate != 0 && !existing.contains(&candidate) {
            return candidate;
        }
    }
}
