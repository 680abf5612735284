//! Length-prefixed sequential record files: write-once append, iterate
//! to read.

use crate::codec::Record;
use byteorder::{LittleEndian, ReadBytesExt};
use sigband_core::{Result, StageError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::marker::PhantomData;
use std::path::Path;

/// Append-only writer for one record type.
pub struct SequenceWriter<T: Record> {
    inner: BufWriter<File>,
    records: u64,
    _marker: PhantomData<T>,
}

impl<T: Record> SequenceWriter<T> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            inner: BufWriter::new(file),
            records: 0,
            _marker: PhantomData,
        })
    }

    pub fn append(&mut self, record: &T) -> Result<()> {
        let mut payload = Vec::new();
        record.encode(&mut payload);
        self.inner.write_all(&(payload.len() as u32).to_le_bytes())?;
        self.inner.write_all(&payload)?;
        self.records += 1;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Flushes and syncs; the file is complete only after this returns.
    pub fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        self.inner.get_ref().sync_all()?;
        Ok(())
    }
}

/// Iterator over a sequence file written by `SequenceWriter`.
pub struct SequenceReader<T: Record> {
    inner: BufReader<File>,
    _marker: PhantomData<T>,
}

impl<T: Record> SequenceReader<T> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: BufReader::new(File::open(path)?),
            _marker: PhantomData,
        })
    }

    fn read_next(&mut self) -> Result<Option<T>> {
        // EOF exactly at a record boundary is the normal end of file
        let len = match self.inner.read_u32::<LittleEndian>() {
            Ok(len) => len as usize,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut payload = vec![0u8; len];
        self.inner.read_exact(&mut payload).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                StageError::Corrupt(format!("record truncated: expected {len} bytes"))
            } else {
                StageError::Io(e)
            }
        })?;
        T::decode(&payload).map(Some)
    }
}

impl<T: Record> Iterator for SequenceReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
