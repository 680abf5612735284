//! Reduce stage: sliding-window chunk construction over one sorted group.

use sigband_core::{
    BitSignature, Counter, CounterSink, DocRecord, Result, SignatureTable, StageError,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Receives finalized tables from the builder.
pub trait TableSink {
    fn emit(&mut self, table: SignatureTable) -> Result<()>;
}

impl TableSink for Vec<SignatureTable> {
    fn emit(&mut self, table: SignatureTable) -> Result<()> {
        self.push(table);
        Ok(())
    }
}

/// Turns the sorted record stream of one permutation-index group into
/// bounded, overlap-linked tables.
///
/// A cut exactly at `chunk_size` can split two adjacent signatures — a
/// genuine near-duplicate pair — across two tables. The builder therefore
/// re-emits the last `overlap_size` entries of each full table as the head
/// of the next one. The downstream window scan then still sees every
/// boundary pair; it deduplicates the doubled candidates itself.
///
/// Records must arrive in non-decreasing signature order. The builder
/// fails fast when the delivery contract is broken rather than emitting
/// incorrect tables.
pub struct ChunkedTableBuilder<'a, S: TableSink> {
    perm_index: u32,
    chunk_size: usize,
    overlap_size: usize,
    buffer: VecDeque<DocRecord>,
    last_signature: Option<BitSignature>,
    sink: &'a mut S,
    counters: Arc<dyn CounterSink>,
}

impl<'a, S: TableSink> ChunkedTableBuilder<'a, S> {
    /// The `overlap_size < chunk_size` precondition is checked here, once
    /// per group, before any record is consumed.
    pub fn new(
        perm_index: u32,
        chunk_size: usize,
        overlap_size: usize,
        sink: &'a mut S,
        counters: Arc<dyn CounterSink>,
    ) -> Result<Self> {
        if chunk_size == 0 || overlap_size >= chunk_size {
            return Err(StageError::InvalidConfig(format!(
                "overlap_size ({overlap_size}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            perm_index,
            chunk_size,
            overlap_size,
            buffer: VecDeque::with_capacity(chunk_size),
            last_signature: None,
            sink,
            counters,
        })
    }

    /// Appends one record. When the buffer reaches `chunk_size` a full
    /// table is emitted and only the last `overlap_size` entries are kept
    /// as the next table's head.
    pub fn push(&mut self, record: DocRecord) -> Result<()> {
        if let Some(last) = &self.last_signature {
            if record.signature < *last {
                return Err(StageError::UnsortedGroup {
                    perm_index: self.perm_index,
                });
            }
        }
        self.last_signature = Some(record.signature.clone());
        self.buffer.push_back(record);
        if self.buffer.len() == self.chunk_size {
            self.emit_snapshot()?;
            // overlap_size < chunk_size, so this always discards something
            while self.buffer.len() > self.overlap_size {
                self.buffer.pop_front();
            }
        }
        Ok(())
    }

    /// End of group: flush whatever remains. A group with zero records
    /// emits nothing.
    pub fn finish(mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.emit_snapshot()
    }

    fn emit_snapshot(&mut self) -> Result<()> {
        let table =
            SignatureTable::from_records(self.perm_index, self.buffer.iter(), self.chunk_size)?;
        let entries = table.len() as u64;
        self.sink.emit(table)?;
        self.counters.incr(Counter::SignaturesInChunks, entries);
        self.counters.incr(Counter::Chunks, 1);
        Ok(())
    }
}
