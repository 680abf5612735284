use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Signature width mismatch: expected {expected} bits, got {got}")]
    SchemaMismatch { expected: usize, got: usize },
    #[error("Table overflow: {entries} entries exceed chunk size {chunk_size}")]
    TableOverflow { entries: usize, chunk_size: usize },
    #[error("Unsorted delivery in group {perm_index}: signatures must arrive in non-decreasing order")]
    UnsortedGroup { perm_index: u32 },
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StageError>;
