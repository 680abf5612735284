//! On-disk layout: parameter-encoded paths for the stage's inputs and
//! outputs.

use sigband_core::{Result, StageConfig, StageError};
use std::fs;
use std::path::{Path, PathBuf};

/// Shared permutation file for a (D, Q) pair.
pub fn permutations_path(config: &StageConfig) -> PathBuf {
    config.output_root.join(format!(
        "permutations-d{}-q{}.bin",
        config.num_bits, config.num_permutations
    ))
}

/// Output directory for the emitted tables. Chunking parameters are
/// encoded in the name so runs with different settings never collide.
pub fn tables_dir(config: &StageConfig) -> PathBuf {
    config.output_root.join(format!(
        "tables-q{}-c{}-o{}",
        config.num_permutations, config.chunk_size, config.overlap_size
    ))
}

/// Part file written by one reduce worker.
pub fn table_part_path(tables_dir: &Path, worker: usize) -> PathBuf {
    tables_dir.join(format!("part-{worker:05}"))
}

/// Input shard files under `input_root`, sorted by name. With a suffix,
/// only shards whose filename ends with it are selected.
pub fn input_shards(input_root: &Path, suffix: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut shards = Vec::new();
    for entry in fs::read_dir(input_root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(suffix) = suffix {
            let name = entry.file_name();
            if !name.to_string_lossy().ends_with(suffix) {
                continue;
            }
        }
        shards.push(path);
    }
    shards.sort();
    if shards.is_empty() {
        return Err(StageError::InvalidConfig(format!(
            "no input shards under {}{}",
            input_root.display(),
            suffix
                .map(|s| format!(" matching suffix '{s}'"))
                .unwrap_or_default()
        )));
    }
    Ok(shards)
}
