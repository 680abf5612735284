//! Test suite for the sigband data model.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sigband_core::{
    BitSignature, Counter, CounterSink, DocRecord, MemoryCounters, Permutation, PermutedKey,
    SignatureTable, StageConfig, StageError,
};

fn sig8(value: u8) -> BitSignature {
    let bits: Vec<bool> = (0..8).map(|i| (value >> (7 - i)) & 1 == 1).collect();
    BitSignature::from_bits(&bits)
}

// ============================================================
// BitSignature
// ============================================================

#[test]
fn test_signature_get_set() {
    let mut sig = BitSignature::zeroed(100);
    assert_eq!(sig.width(), 100);
    sig.set(0, true);
    sig.set(63, true);
    sig.set(64, true);
    sig.set(99, true);
    assert!(sig.get(0));
    assert!(sig.get(63));
    assert!(sig.get(64));
    assert!(sig.get(99));
    assert!(!sig.get(1));
    assert!(!sig.get(65));
    sig.set(64, false);
    assert!(!sig.get(64));
}

#[test]
fn test_signature_order_is_bit_lexicographic() {
    // bit 0 is the most significant position
    let mut a = BitSignature::zeroed(8);
    let mut b = BitSignature::zeroed(8);
    a.set(0, true);
    b.set(1, true);
    assert!(a > b);

    // equal prefixes, later bit decides
    let mut c = BitSignature::zeroed(8);
    let mut d = BitSignature::zeroed(8);
    c.set(0, true);
    d.set(0, true);
    d.set(7, true);
    assert!(d > c);

    // numeric order of packed values matches
    assert!(sig8(3) < sig8(4));
    assert!(sig8(200) > sig8(199));
}

#[test]
fn test_signature_order_across_word_boundary() {
    let mut a = BitSignature::zeroed(96);
    let mut b = BitSignature::zeroed(96);
    a.set(70, true);
    b.set(71, true);
    assert!(a > b);
    assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
}

#[test]
fn test_signature_permute_identity() {
    let sig = sig8(0b1010_0110);
    let permuted = sig.permute(&Permutation::identity(8));
    assert_eq!(permuted, sig);
}

#[test]
fn test_signature_permute_moves_bits() {
    // mapping [1, 0, 2, 3, ...]: output bit 0 reads input bit 1
    let mut mapping: Vec<u32> = (0..8).collect();
    mapping.swap(0, 1);
    let perm = Permutation::from_mapping(mapping).unwrap();
    let mut sig = BitSignature::zeroed(8);
    sig.set(1, true);
    let permuted = sig.permute(&perm);
    assert!(permuted.get(0));
    assert!(!permuted.get(1));
}

#[test]
fn test_permute_inverse_roundtrip() {
    let mut rng = StdRng::seed_from_u64(7);
    for width in [8usize, 64, 96, 200] {
        let bits: Vec<bool> = (0..width).map(|i| i % 3 == 0 || i % 7 == 1).collect();
        let sig = BitSignature::from_bits(&bits);
        let perm = Permutation::random(width, &mut rng);
        let roundtrip = sig.permute(&perm).permute(&perm.inverse());
        assert_eq!(roundtrip, sig, "width {width}");
    }
}

#[test]
fn test_signature_from_words_masks_padding() {
    let sig = BitSignature::from_words(8, vec![u64::MAX]).unwrap();
    let mut expected = BitSignature::zeroed(8);
    for i in 0..8 {
        expected.set(i, true);
    }
    assert_eq!(sig, expected);
}

#[test]
fn test_signature_from_words_rejects_wrong_word_count() {
    assert!(matches!(
        BitSignature::from_words(65, vec![0u64]),
        Err(StageError::Corrupt(_))
    ));
}

#[test]
fn test_signature_display() {
    assert_eq!(sig8(0b1010_0000).to_string(), "10100000");
}

// ============================================================
// Permutation
// ============================================================

#[test]
fn test_random_permutation_is_bijection() {
    let mut rng = StdRng::seed_from_u64(42);
    for width in [1usize, 2, 8, 64, 100, 512] {
        for _ in 0..5 {
            let perm = Permutation::random(width, &mut rng);
            let mut positions: Vec<u32> = perm.as_slice().to_vec();
            positions.sort_unstable();
            let expected: Vec<u32> = (0..width as u32).collect();
            assert_eq!(positions, expected, "width {width}");
        }
    }
}

#[test]
fn test_from_mapping_rejects_duplicates() {
    assert!(Permutation::from_mapping(vec![0, 1, 1, 3]).is_err());
}

#[test]
fn test_from_mapping_rejects_out_of_range() {
    assert!(Permutation::from_mapping(vec![0, 1, 4]).is_err());
}

#[test]
fn test_inverse_composes_to_identity() {
    let mut rng = StdRng::seed_from_u64(3);
    let perm = Permutation::random(32, &mut rng);
    let inv = perm.inverse();
    for i in 0..32 {
        assert_eq!(perm.index(inv.index(i)), i);
        assert_eq!(inv.index(perm.index(i)), i);
    }
}

// ============================================================
// PermutedKey / DocRecord / SignatureTable
// ============================================================

#[test]
fn test_permuted_key_orders_by_index_first() {
    let low_index_high_sig = PermutedKey {
        perm_index: 0,
        signature: sig8(255),
    };
    let high_index_low_sig = PermutedKey {
        perm_index: 1,
        signature: sig8(0),
    };
    assert!(low_index_high_sig < high_index_low_sig);
}

#[test]
fn test_permuted_key_orders_by_signature_second() {
    let a = PermutedKey {
        perm_index: 2,
        signature: sig8(10),
    };
    let b = PermutedKey {
        perm_index: 2,
        signature: sig8(11),
    };
    assert!(a < b);
}

#[test]
fn test_table_snapshot() {
    let records: Vec<DocRecord> = (0..3).map(|i| DocRecord::new(i, sig8(i as u8))).collect();
    let table = SignatureTable::from_records(5, &records, 4).unwrap();
    assert_eq!(table.perm_index(), 5);
    assert_eq!(table.len(), 3);
    assert_eq!(table.doc_ids(), &[0, 1, 2]);
    assert_eq!(table.entry(1), (1, &sig8(1)));
}

#[test]
fn test_table_rejects_overflow() {
    let records: Vec<DocRecord> = (0..5).map(|i| DocRecord::new(i, sig8(i as u8))).collect();
    assert!(matches!(
        SignatureTable::from_records(0, &records, 4),
        Err(StageError::TableOverflow {
            entries: 5,
            chunk_size: 4
        })
    ));
}

#[test]
fn test_table_from_columns_rejects_mismatch() {
    assert!(SignatureTable::from_columns(0, vec![1, 2], vec![sig8(1)]).is_err());
}

// ============================================================
// Counters
// ============================================================

#[test]
fn test_counters_accumulate() {
    let counters = MemoryCounters::new();
    counters.incr(Counter::Signatures, 1);
    counters.incr(Counter::Signatures, 2);
    counters.incr(Counter::Chunks, 1);
    counters.incr(Counter::SignaturesInChunks, 7);
    assert_eq!(counters.get(Counter::Signatures), 3);
    assert_eq!(counters.get(Counter::Chunks), 1);
    assert_eq!(counters.get(Counter::SignaturesInChunks), 7);
}

#[test]
fn test_counter_names() {
    assert_eq!(Counter::Signatures.name(), "Signatures");
    assert_eq!(Counter::Chunks.name(), "Chunks");
    assert_eq!(Counter::SignaturesInChunks.name(), "SignaturesInChunks");
}

// ============================================================
// StageConfig
// ============================================================

#[test]
fn test_config_default_is_valid() {
    assert!(StageConfig::default().validate().is_ok());
}

#[test]
fn test_config_rejects_overlap_not_smaller_than_chunk() {
    let mut config = StageConfig::default();
    config.chunk_size = 10;
    config.overlap_size = 10;
    assert!(matches!(
        config.validate(),
        Err(StageError::InvalidConfig(_))
    ));
    config.overlap_size = 11;
    assert!(config.validate().is_err());
    config.overlap_size = 9;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_zero_parameters() {
    for field in ["num_bits", "num_permutations", "chunk_size", "workers"] {
        let mut config = StageConfig::default();
        match field {
            "num_bits" => config.num_bits = 0,
            "num_permutations" => config.num_permutations = 0,
            "chunk_size" => config.chunk_size = 0,
            _ => config.num_reduce_workers = 0,
        }
        assert!(config.validate().is_err(), "{field} = 0 must be rejected");
    }
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stage.json");
    let config = StageConfig {
        num_bits: 8,
        num_permutations: 2,
        chunk_size: 4,
        overlap_size: 1,
        ..StageConfig::default()
    };
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
    let loaded = StageConfig::from_file(&path).unwrap();
    assert_eq!(loaded.num_bits, 8);
    assert_eq!(loaded.overlap_size, 1);
}

#[test]
fn test_config_from_file_rejects_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stage.json");
    let mut config = StageConfig::default();
    config.overlap_size = config.chunk_size;
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
    assert!(StageConfig::from_file(&path).is_err());
}
