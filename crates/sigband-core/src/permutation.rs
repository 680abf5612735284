//! Bit-position permutations.

use crate::error::{Result, StageError};
use rand::seq::SliceRandom;
use rand::Rng;

/// A bijection over bit positions `[0, width)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    mapping: Vec<u32>,
}

impl Permutation {
    pub fn identity(width: usize) -> Self {
        Self {
            mapping: (0..width as u32).collect(),
        }
    }

    /// Uniformly random bijection (Fisher-Yates shuffle of the identity).
    pub fn random<R: Rng>(width: usize, rng: &mut R) -> Self {
        let mut mapping: Vec<u32> = (0..width as u32).collect();
        mapping.shuffle(rng);
        Self { mapping }
    }

    /// Accepts `mapping` only if it is a full bijection: every position in
    /// `[0, len)` appears exactly once.
    pub fn from_mapping(mapping: Vec<u32>) -> Result<Self> {
        let width = mapping.len();
        let mut seen = vec![false; width];
        for &m in &mapping {
            let m = m as usize;
            if m >= width || seen[m] {
                return Err(StageError::Corrupt(format!(
                    "mapping of length {width} is not a bijection: position {m} out of range or repeated"
                )));
            }
            seen[m] = true;
        }
        Ok(Self { mapping })
    }

    pub fn width(&self) -> usize {
        self.mapping.len()
    }

    /// Source position for output bit `i`.
    pub fn index(&self, i: usize) -> usize {
        self.mapping[i] as usize
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.mapping
    }

    /// The inverse bijection; permuting by `self` and then by the inverse
    /// is the identity.
    pub fn inverse(&self) -> Permutation {
        let mut inv = vec![0u32; self.mapping.len()];
        for (i, &m) in self.mapping.iter().enumerate() {
            inv[m as usize] = i as u32;
        }
        Self { mapping: inv }
    }
}
