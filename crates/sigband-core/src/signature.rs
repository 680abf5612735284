//! Fixed-width bit signatures with a total lexicographic order.

use crate::error::{Result, StageError};
use crate::permutation::Permutation;
use std::cmp::Ordering;
use std::fmt;

const WORD_BITS: usize = 64;

/// Fixed-width packed bit-vector fingerprint.
///
/// Bits are packed MSB-first inside each word: position 0 maps to the top
/// bit of the first word. Comparing the word arrays lexicographically is
/// then identical to comparing the bit strings position by position,
/// which is the order the sorted table stream depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitSignature {
    bits: usize,
    words: Vec<u64>,
}

impl BitSignature {
    /// All-zero signature of the given width.
    pub fn zeroed(bits: usize) -> Self {
        let words = vec![0u64; bits.div_ceil(WORD_BITS)];
        Self { bits, words }
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        let mut sig = Self::zeroed(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                sig.set(i, true);
            }
        }
        sig
    }

    /// Width in bits (D).
    pub fn width(&self) -> usize {
        self.bits
    }

    pub fn get(&self, pos: usize) -> bool {
        assert!(pos < self.bits, "bit {pos} out of range for width {}", self.bits);
        let word = self.words[pos / WORD_BITS];
        (word >> (WORD_BITS - 1 - (pos % WORD_BITS))) & 1 == 1
    }

    pub fn set(&mut self, pos: usize, value: bool) {
        assert!(pos < self.bits, "bit {pos} out of range for width {}", self.bits);
        let mask = 1u64 << (WORD_BITS - 1 - (pos % WORD_BITS));
        if value {
            self.words[pos / WORD_BITS] |= mask;
        } else {
            self.words[pos / WORD_BITS] &= !mask;
        }
    }

    /// Rearranged copy: bit `i` of the result is bit `perm.index(i)` of
    /// `self`. Applying the inverse permutation afterwards restores the
    /// original signature.
    pub fn permute(&self, perm: &Permutation) -> BitSignature {
        assert_eq!(
            perm.width(),
            self.bits,
            "permutation width does not match signature width"
        );
        let mut out = Self::zeroed(self.bits);
        for i in 0..self.bits {
            if self.get(perm.index(i)) {
                out.set(i, true);
            }
        }
        out
    }

    /// Raw packed words, for the storage codec.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Rebuilds a signature from packed words (codec path). Padding bits
    /// past `bits` are cleared so equality and ordering stay canonical.
    pub fn from_words(bits: usize, mut words: Vec<u64>) -> Result<Self> {
        let expected = bits.div_ceil(WORD_BITS);
        if words.len() != expected {
            return Err(StageError::Corrupt(format!(
                "signature of width {bits} needs {expected} words, got {}",
                words.len()
            )));
        }
        let tail = bits % WORD_BITS;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last &= !0u64 << (WORD_BITS - tail);
            }
        }
        Ok(Self { bits, words })
    }
}

impl PartialOrd for BitSignature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitSignature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.words.cmp(&other.words).then(self.bits.cmp(&other.bits))
    }
}

impl fmt::Display for BitSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 0..self.bits {
            write!(f, "{}", if self.get(pos) { '1' } else { '0' })?;
        }
        Ok(())
    }
}
