//! Shuffle routing: all records of one permutation index go to one worker.

use sigband_core::PermutedKey;

/// Deterministic worker assignment by permutation index. The reduce stage
/// needs a complete contiguous view of each group, so the index alone
/// picks the worker; if Q exceeds the worker count, one worker handles
/// several groups as independent sequential streams.
pub fn route(key: &PermutedKey, num_workers: usize) -> usize {
    debug_assert!(num_workers > 0);
    key.perm_index as usize % num_workers
}
