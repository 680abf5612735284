//! Persist-once storage for the shared permutation list.

use crate::sequence::{SequenceReader, SequenceWriter};
use sigband_core::{Permutation, Result, StageError};
use std::path::Path;
use tracing::info;

/// Writes the permutation list unless the file already exists. Every
/// worker of a run must observe the identical sequence, so a second
/// writer backs off instead of regenerating.
pub fn write_permutations(path: &Path, permutations: &[Permutation]) -> Result<()> {
    if path.exists() {
        info!(path = %path.display(), "permutation file already exists, keeping it");
        return Ok(());
    }
    let mut writer = SequenceWriter::create(path)?;
    for permutation in permutations {
        writer.append(permutation)?;
    }
    writer.finish()
}

/// Reads the shared permutation list, requiring exactly `expected`
/// entries of uniform width `num_bits`. Each entry is validated as a
/// full bijection on decode.
pub fn read_permutations(path: &Path, num_bits: usize, expected: usize) -> Result<Vec<Permutation>> {
    let unreadable = |detail: String| {
        StageError::InvalidConfig(format!(
            "unreadable permutation file {}: {detail}",
            path.display()
        ))
    };
    let reader = SequenceReader::<Permutation>::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut permutations = Vec::with_capacity(expected);
    for permutation in reader {
        let permutation = permutation.map_err(|e| unreadable(e.to_string()))?;
        if permutation.width() != num_bits {
            return Err(StageError::InvalidConfig(format!(
                "permutation width {} in {} does not match num_bits {num_bits}",
                permutation.width(),
                path.display()
            )));
        }
        permutations.push(permutation);
    }
    if permutations.len() != expected {
        return Err(StageError::InvalidConfig(format!(
            "permutation file {} holds {} permutations, expected {expected}",
            path.display(),
            permutations.len()
        )));
    }
    Ok(permutations)
}
