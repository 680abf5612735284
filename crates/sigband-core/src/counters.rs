//! Named counter sink, the engine-facing accounting interface.

use std::sync::atomic::{AtomicU64, Ordering};

/// Job-level counters tracked across the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Input signatures seen by the map stage.
    Signatures,
    /// Tables emitted by the reduce stage.
    Chunks,
    /// Entries written across all emitted tables; overlap entries count
    /// once per table they appear in.
    SignaturesInChunks,
}

impl Counter {
    pub fn name(&self) -> &'static str {
        match self {
            Counter::Signatures => "Signatures",
            Counter::Chunks => "Chunks",
            Counter::SignaturesInChunks => "SignaturesInChunks",
        }
    }
}

/// Sink accepting named increments. Implementations must be safe to share
/// across map workers.
pub trait CounterSink: Send + Sync {
    fn incr(&self, counter: Counter, delta: u64);
}

/// In-process counter sink backed by atomics.
#[derive(Debug, Default)]
pub struct MemoryCounters {
    signatures: AtomicU64,
    chunks: AtomicU64,
    signatures_in_chunks: AtomicU64,
}

impl MemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Signatures => self.signatures.load(Ordering::Relaxed),
            Counter::Chunks => self.chunks.load(Ordering::Relaxed),
            Counter::SignaturesInChunks => self.signatures_in_chunks.load(Ordering::Relaxed),
        }
    }
}

impl CounterSink for MemoryCounters {
    fn incr(&self, counter: Counter, delta: u64) {
        let cell = match counter {
            Counter::Signatures => &self.signatures,
            Counter::Chunks => &self.chunks,
            Counter::SignaturesInChunks => &self.signatures_in_chunks,
        };
        cell.fetch_add(delta, Ordering::Relaxed);
    }
}

/// Discards all increments.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCounters;

impl CounterSink for NullCounters {
    fn incr(&self, _counter: Counter, _delta: u64) {}
}
