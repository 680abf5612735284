//! Keyed records and the emitted table container.

use crate::error::{Result, StageError};
use crate::signature::BitSignature;

/// Composite shuffle key: permutation index first, permuted signature
/// second. The derived ordering is exactly the sort order the reduce
/// stage consumes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PermutedKey {
    pub perm_index: u32,
    pub signature: BitSignature,
}

/// One (document, signature) pair, held transiently while a chunk
/// accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRecord {
    pub doc_id: u64,
    pub signature: BitSignature,
}

impl DocRecord {
    pub fn new(doc_id: u64, signature: BitSignature) -> Self {
        Self { doc_id, signature }
    }
}

/// Write-once bounded batch of (doc id, signature) entries for one
/// permutation index.
///
/// Snapshots copy out of the builder's live buffer, so an emitted table
/// never aliases the buffer it was cut from; there are no mutators after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureTable {
    perm_index: u32,
    doc_ids: Vec<u64>,
    signatures: Vec<BitSignature>,
}

impl SignatureTable {
    /// Copies `records` into a finalized snapshot. Batches larger than
    /// `chunk_size` are rejected.
    pub fn from_records<'a, I>(perm_index: u32, records: I, chunk_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a DocRecord>,
    {
        let mut doc_ids = Vec::new();
        let mut signatures = Vec::new();
        for record in records {
            doc_ids.push(record.doc_id);
            signatures.push(record.signature.clone());
        }
        if doc_ids.len() > chunk_size {
            return Err(StageError::TableOverflow {
                entries: doc_ids.len(),
                chunk_size,
            });
        }
        Ok(Self {
            perm_index,
            doc_ids,
            signatures,
        })
    }

    /// Rebuilds a table from parallel columns (codec path).
    pub fn from_columns(
        perm_index: u32,
        doc_ids: Vec<u64>,
        signatures: Vec<BitSignature>,
    ) -> Result<Self> {
        if doc_ids.len() != signatures.len() {
            return Err(StageError::Corrupt(format!(
                "table columns disagree: {} doc ids, {} signatures",
                doc_ids.len(),
                signatures.len()
            )));
        }
        Ok(Self {
            perm_index,
            doc_ids,
            signatures,
        })
    }

    pub fn perm_index(&self) -> u32 {
        self.perm_index
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    pub fn doc_ids(&self) -> &[u64] {
        &self.doc_ids
    }

    pub fn signatures(&self) -> &[BitSignature] {
        &self.signatures
    }

    /// Entry `i` as a (doc id, signature) pair.
    pub fn entry(&self, i: usize) -> (u64, &BitSignature) {
        (self.doc_ids[i], &self.signatures[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &BitSignature)> {
        self.doc_ids.iter().copied().zip(self.signatures.iter())
    }
}
