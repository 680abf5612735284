//! sigband-stage — the map/partition/reduce core of permuted table
//! generation.
//!
//! Pipeline: generate Q random bit permutations, permute every input
//! signature Q ways, shuffle by (permutation index, permuted signature),
//! then chunk each sorted group into bounded, overlap-linked tables.
//! After permutation and sorting, near-duplicate documents sit next to
//! each other, so a downstream window scan can find candidate pairs
//! without comparing all pairs.

pub mod builder;
pub mod generator;
pub mod partition;
pub mod permuter;
pub mod stage;

pub use builder::{ChunkedTableBuilder, TableSink};
pub use generator::PermutationGenerator;
pub use partition::route;
pub use permuter::SignaturePermuter;
pub use stage::{StageReport, TableStage};
