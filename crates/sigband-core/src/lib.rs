//! sigband-core — data model for chunked permuted signature tables.
//!
//! Near-duplicate candidate generation by permutation banding: fixed-width
//! bit signatures are run through Q random bit permutations and sorted, so
//! similar documents land next to each other. This crate holds the shared
//! vocabulary of that pipeline: signatures, permutations, keyed records,
//! the emitted table container, configuration, and counter plumbing.

pub mod config;
pub mod counters;
pub mod error;
pub mod permutation;
pub mod signature;
pub mod table;

pub use config::StageConfig;
pub use counters::{Counter, CounterSink, MemoryCounters, NullCounters};
pub use error::{Result, StageError};
pub use permutation::Permutation;
pub use signature::BitSignature;
pub use table::{DocRecord, PermutedKey, SignatureTable};
