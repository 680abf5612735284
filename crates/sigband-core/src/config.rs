use crate::error::{Result, StageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration surface of the permuted-tables stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Bits per signature (D).
    pub num_bits: usize,
    /// Number of random permutations (Q).
    pub num_permutations: usize,
    /// Entries per emitted table (C).
    pub chunk_size: usize,
    /// Entries carried from one table's tail into the next table's head (O).
    pub overlap_size: usize,
    pub num_map_workers: usize,
    pub num_reduce_workers: usize,
    /// Directory holding the input signature shards.
    pub input_root: PathBuf,
    /// Directory receiving the permutation file and the table output.
    pub output_root: PathBuf,
    /// When set, process only the input shard whose filename ends with
    /// this suffix instead of the whole collection.
    pub shard_suffix: Option<String>,
}

impl StageConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: StageConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded stage config");
        Ok(config)
    }

    /// Fatal parameter checks, run before any record is processed.
    pub fn validate(&self) -> Result<()> {
        if self.num_bits == 0 {
            return Err(StageError::InvalidConfig("num_bits must be positive".into()));
        }
        if self.num_permutations == 0 {
            return Err(StageError::InvalidConfig(
                "num_permutations must be positive".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(StageError::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.overlap_size >= self.chunk_size {
            return Err(StageError::InvalidConfig(format!(
                "overlap_size ({}) must be smaller than chunk_size ({})",
                self.overlap_size, self.chunk_size
            )));
        }
        if self.num_map_workers == 0 || self.num_reduce_workers == 0 {
            return Err(StageError::InvalidConfig(
                "worker counts must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            num_bits: 64,
            num_permutations: 8,
            chunk_size: 10_000,
            overlap_size: 1_000,
            num_map_workers: 4,
            num_reduce_workers: 4,
            input_root: PathBuf::from("signatures"),
            output_root: PathBuf::from("tables"),
            shard_suffix: None,
        }
    }
}
