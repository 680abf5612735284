//! End-to-end stage driver: a single-process runner honoring the
//! grouped-sorted delivery contract a distributed engine would provide.

use crate::builder::{ChunkedTableBuilder, TableSink};
use crate::generator::PermutationGenerator;
use crate::partition;
use crate::permuter::SignaturePermuter;
use sigband_core::{
    Counter, DocRecord, MemoryCounters, Permutation, PermutedKey, Result, SignatureTable,
    StageConfig, StageError,
};
use sigband_storage::{layout, SequenceReader, SequenceWriter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

impl TableSink for SequenceWriter<SignatureTable> {
    fn emit(&mut self, table: SignatureTable) -> Result<()> {
        self.append(&table)
    }
}

/// Outcome of one stage invocation.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub skipped: bool,
    pub output_dir: PathBuf,
    pub signatures: u64,
    pub chunks: u64,
    pub signatures_in_chunks: u64,
}

/// The permuted-tables stage: map input signatures through Q permutations,
/// shuffle by (permutation index, permuted signature), and reduce each
/// group into chunked, overlap-linked tables on disk.
pub struct TableStage {
    config: StageConfig,
}

impl TableStage {
    pub fn new(config: StageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the stage to completion. A run whose output directory already
    /// exists is a no-op, and a failed run leaves no partial output: the
    /// reduce writes into a staging directory that is renamed into place
    /// only after every part file is finished.
    pub fn run(&self) -> Result<StageReport> {
        let output_dir = layout::tables_dir(&self.config);
        if output_dir.exists() {
            info!(output = %output_dir.display(), "permuted tables already exist, skipping");
            return Ok(StageReport {
                skipped: true,
                output_dir,
                signatures: 0,
                chunks: 0,
                signatures_in_chunks: 0,
            });
        }

        let counters = Arc::new(MemoryCounters::new());
        let generator =
            PermutationGenerator::new(self.config.num_bits, self.config.num_permutations)?;
        let permutations = Arc::new(generator.create_or_load(
            &layout::permutations_path(&self.config),
            &mut rand::thread_rng(),
        )?);

        let shards =
            layout::input_shards(&self.config.input_root, self.config.shard_suffix.as_deref())?;
        info!(
            shards = shards.len(),
            permutations = permutations.len(),
            "map phase starting"
        );
        let mut buckets = self.map_phase(&shards, permutations, counters.clone())?;

        // Shuffle contract: each bucket sorted by (perm_index, signature).
        for bucket in &mut buckets {
            bucket.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        }

        let staging_dir = output_dir.with_extension("tmp");
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir)?;
        }
        fs::create_dir_all(&staging_dir)?;
        info!(workers = buckets.len(), "reduce phase starting");
        if let Err(e) = self.reduce_phase(&buckets, &staging_dir, counters.clone()) {
            let _ = fs::remove_dir_all(&staging_dir);
            return Err(e);
        }
        fs::rename(&staging_dir, &output_dir)?;

        let report = StageReport {
            skipped: false,
            output_dir,
            signatures: counters.get(Counter::Signatures),
            chunks: counters.get(Counter::Chunks),
            signatures_in_chunks: counters.get(Counter::SignaturesInChunks),
        };
        info!(
            signatures = report.signatures,
            chunks = report.chunks,
            signatures_in_chunks = report.signatures_in_chunks,
            "stage complete"
        );
        Ok(report)
    }

    /// Embarrassingly parallel map: shards are split across
    /// `num_map_workers` threads. The only shared state is the read-only
    /// permutation list and the atomic counter sink.
    fn map_phase(
        &self,
        shards: &[PathBuf],
        permutations: Arc<Vec<Permutation>>,
        counters: Arc<MemoryCounters>,
    ) -> Result<Vec<Vec<(PermutedKey, u64)>>> {
        let num_reduce = self.config.num_reduce_workers;
        let workers = self.config.num_map_workers.min(shards.len()).max(1);
        let batch = shards.len().div_ceil(workers);

        let results: Vec<Result<Vec<Vec<(PermutedKey, u64)>>>> = std::thread::scope(|scope| {
            let mut handles = Vec::new();
            for shard_batch in shards.chunks(batch) {
                let permutations = permutations.clone();
                let counters = counters.clone();
                handles.push(scope.spawn(
                    move || -> Result<Vec<Vec<(PermutedKey, u64)>>> {
                        let permuter = SignaturePermuter::new(permutations, counters)?;
                        let mut buckets: Vec<Vec<(PermutedKey, u64)>> =
                            vec![Vec::new(); num_reduce];
                        for shard in shard_batch {
                            let reader = SequenceReader::<DocRecord>::open(shard)?;
                            for record in reader {
                                let record = record?;
                                for (key, doc_id) in
                                    permuter.process(record.doc_id, &record.signature)?
                                {
                                    let worker = partition::route(&key, num_reduce);
                                    buckets[worker].push((key, doc_id));
                                }
                            }
                        }
                        Ok(buckets)
                    },
                ));
            }
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(StageError::Other(anyhow::anyhow!("map worker panicked")))
                    })
                })
                .collect()
        });

        let mut merged: Vec<Vec<(PermutedKey, u64)>> = vec![Vec::new(); num_reduce];
        for result in results {
            let buckets = result?;
            for (worker, mut bucket) in buckets.into_iter().enumerate() {
                merged[worker].append(&mut bucket);
            }
        }
        Ok(merged)
    }

    /// Sequential reduce per worker: each bucket holds whole groups, and a
    /// group's records flow strictly in sorted order through one builder.
    fn reduce_phase(
        &self,
        buckets: &[Vec<(PermutedKey, u64)>],
        staging_dir: &Path,
        counters: Arc<MemoryCounters>,
    ) -> Result<()> {
        for (worker, bucket) in buckets.iter().enumerate() {
            let mut writer = SequenceWriter::<SignatureTable>::create(&layout::table_part_path(
                staging_dir,
                worker,
            ))?;
            let mut index = 0;
            while index < bucket.len() {
                let perm_index = bucket[index].0.perm_index;
                let mut builder = ChunkedTableBuilder::new(
                    perm_index,
                    self.config.chunk_size,
                    self.config.overlap_size,
                    &mut writer,
                    counters.clone(),
                )?;
                while index < bucket.len() && bucket[index].0.perm_index == perm_index {
                    let (key, doc_id) = &bucket[index];
                    builder.push(DocRecord::new(*doc_id, key.signature.clone()))?;
                    index += 1;
                }
                builder.finish()?;
            }
            writer.finish()?;
        }
        Ok(())
    }
}
