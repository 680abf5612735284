//! Map stage: apply all Q permutations to one input signature.

use sigband_core::{
    BitSignature, Counter, CounterSink, Permutation, PermutedKey, Result, StageError,
};
use std::sync::Arc;

/// Per-worker map context: the shared read-only permutation list plus the
/// counter sink. Pure over its input; no cross-record state.
pub struct SignaturePermuter {
    permutations: Arc<Vec<Permutation>>,
    num_bits: usize,
    counters: Arc<dyn CounterSink>,
}

impl SignaturePermuter {
    pub fn new(
        permutations: Arc<Vec<Permutation>>,
        counters: Arc<dyn CounterSink>,
    ) -> Result<Self> {
        let num_bits = match permutations.first() {
            Some(first) => first.width(),
            None => return Err(StageError::InvalidConfig("permutation list is empty".into())),
        };
        if let Some(odd) = permutations.iter().find(|p| p.width() != num_bits) {
            return Err(StageError::InvalidConfig(format!(
                "permutation widths disagree: {num_bits} vs {}",
                odd.width()
            )));
        }
        Ok(Self {
            permutations,
            num_bits,
            counters,
        })
    }

    /// Number of keyed records emitted per input (Q).
    pub fn fanout(&self) -> usize {
        self.permutations.len()
    }

    /// Emits one `(key, doc_id)` pair per permutation. The key orders by
    /// (permutation index, permuted signature), which is what the shuffle
    /// sorts on.
    pub fn process(&self, doc_id: u64, signature: &BitSignature) -> Result<Vec<(PermutedKey, u64)>> {
        if signature.width() != self.num_bits {
            return Err(StageError::SchemaMismatch {
                expected: self.num_bits,
                got: signature.width(),
            });
        }
        let out = self
            .permutations
            .iter()
            .enumerate()
            .map(|(i, permutation)| {
                let key = PermutedKey {
                    perm_index: i as u32,
                    signature: signature.permute(permutation),
                };
                (key, doc_id)
            })
            .collect();
        self.counters.incr(Counter::Signatures, 1);
        Ok(out)
    }
}
