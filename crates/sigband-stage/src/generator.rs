//! Random permutation generation, persisted once and shared read-only.

use rand::Rng;
use sigband_core::{Permutation, Result, StageError};
use sigband_storage::permutations;
use std::path::Path;
use tracing::info;

/// Produces the Q random bit-position bijections for a stage run.
#[derive(Debug, Clone, Copy)]
pub struct PermutationGenerator {
    num_bits: usize,
    count: usize,
}

impl PermutationGenerator {
    pub fn new(num_bits: usize, count: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(StageError::InvalidConfig("num_bits must be positive".into()));
        }
        if count == 0 {
            return Err(StageError::InvalidConfig(
                "num_permutations must be positive".into(),
            ));
        }
        Ok(Self { num_bits, count })
    }

    /// Q fresh uniformly random bijections over `[0, num_bits)`. They need
    /// not be pairwise distinct.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Permutation> {
        (0..self.count)
            .map(|_| Permutation::random(self.num_bits, rng))
            .collect()
    }

    /// Loads the shared list if `path` already holds one, otherwise
    /// generates and persists it. Permutation `i` always produces
    /// partition key `i`, so the sequence must be identical for every
    /// worker of one run.
    pub fn create_or_load<R: Rng>(&self, path: &Path, rng: &mut R) -> Result<Vec<Permutation>> {
        if path.exists() {
            return permutations::read_permutations(path, self.num_bits, self.count);
        }
        info!(
            num_bits = self.num_bits,
            count = self.count,
            path = %path.display(),
            "generating random permutations"
        );
        let generated = self.generate(rng);
        permutations::write_permutations(path, &generated)?;
        Ok(generated)
    }
}
