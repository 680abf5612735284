//! Binary record codec — little-endian, length fields first.

use byteorder::{LittleEndian, ReadBytesExt};
use sigband_core::{BitSignature, DocRecord, Permutation, Result, SignatureTable};
use std::io::Cursor;

/// A value that can ride through a sequence file.
pub trait Record: Sized {
    fn encode(&self, buf: &mut Vec<u8>);
    fn decode(bytes: &[u8]) -> Result<Self>;
}

fn write_signature(buf: &mut Vec<u8>, sig: &BitSignature) {
    buf.extend_from_slice(&(sig.width() as u32).to_le_bytes());
    for word in sig.words() {
        buf.extend_from_slice(&word.to_le_bytes());
    }
}

fn read_signature(cur: &mut Cursor<&[u8]>) -> Result<BitSignature> {
    let bits = cur.read_u32::<LittleEndian>()? as usize;
    let word_count = bits.div_ceil(64);
    let mut words = Vec::with_capacity(word_count);
    for _ in 0..word_count {
        words.push(cur.read_u64::<LittleEndian>()?);
    }
    BitSignature::from_words(bits, words)
}

impl Record for DocRecord {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.doc_id.to_le_bytes());
        write_signature(buf, &self.signature);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        let doc_id = cur.read_u64::<LittleEndian>()?;
        let signature = read_signature(&mut cur)?;
        Ok(DocRecord { doc_id, signature })
    }
}

impl Record for Permutation {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.width() as u32).to_le_bytes());
        for &m in self.as_slice() {
            buf.extend_from_slice(&m.to_le_bytes());
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        let width = cur.read_u32::<LittleEndian>()? as usize;
        let mut mapping = Vec::with_capacity(width);
        for _ in 0..width {
            mapping.push(cur.read_u32::<LittleEndian>()?);
        }
        // rejects anything that is not a full bijection
        Permutation::from_mapping(mapping)
    }
}

impl Record for SignatureTable {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.perm_index().to_le_bytes());
        buf.extend_from_slice(&(self.len() as u32).to_le_bytes());
        for (doc_id, signature) in self.iter() {
            buf.extend_from_slice(&doc_id.to_le_bytes());
            write_signature(buf, signature);
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        let perm_index = cur.read_u32::<LittleEndian>()?;
        let count = cur.read_u32::<LittleEndian>()? as usize;
        let mut doc_ids = Vec::with_capacity(count);
        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            doc_ids.push(cur.read_u64::<LittleEndian>()?);
            signatures.push(read_signature(&mut cur)?);
        }
        SignatureTable::from_columns(perm_index, doc_ids, signatures)
    }
}
