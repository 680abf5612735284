//! sigband-storage — durable sequential record storage.
//!
//! Length-prefixed binary record files (write-once append, iterate to
//! read), the codec for the pipeline's record types, the parameter-encoded
//! on-disk layout of the stage, and persist-once handling of the shared
//! permutation list.

pub mod codec;
pub mod layout;
pub mod permutations;
pub mod sequence;

pub use codec::Record;
pub use sequence::{SequenceReader, SequenceWriter};
