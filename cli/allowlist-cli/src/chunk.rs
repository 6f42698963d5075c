//! Proof records, the chunk partitioner and chunk file I/O.
//!
//! A proof dataset maps lowercase addresses to `{ "proof": ... }` records.
//! Chunks are contiguous slices of the sorted address list, each stored as
//! `<lowercase address of last entry>.json`, so a consumer can locate the one
//! file covering an address from the sorted list of file names alone.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::address::Address;
use crate::common::{format_proof, hex_encode, parse_hash, parse_proof};
use crate::error::{AllowlistError, Result};

/// Lowercase address -> proof record, ordered by key.
pub type ProofMap = BTreeMap<String, ProofRecord>;

/// How proof siblings are written into a [`ProofRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProofEncoding {
    /// Comma-joined string, as read by existing consumers.
    #[default]
    Joined,
    /// JSON array of hex strings.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProofField {
    Joined(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    pub proof: ProofField,
}

impl ProofRecord {
    pub fn new(proof: &[[u8; 32]], encoding: ProofEncoding) -> Self {
        let proof = match encoding {
            ProofEncoding::Joined => ProofField::Joined(format_proof(proof)),
            ProofEncoding::List => ProofField::List(proof.iter().map(hex_encode).collect()),
        };
        Self { proof }
    }

    /// Decodes the sibling hashes regardless of encoding.
    pub fn siblings(&self) -> Result<Vec<[u8; 32]>> {
        match &self.proof {
            ProofField::Joined(joined) => parse_proof(joined),
            ProofField::List(items) => items.iter().map(|item| parse_hash(item)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Lowercase form of the last address in the chunk.
    pub key: String,
    pub entries: ProofMap,
}

impl Chunk {
    pub fn file_name(&self) -> String {
        chunk_file_name(&self.key)
    }
}

pub fn chunk_file_name(key: &str) -> String {
    format!("{key}.json")
}

/// Splits `addresses` into contiguous chunks of at most `chunk_size` entries.
///
/// `addresses` must already be in canonical (ascending) order; chunk
/// boundaries follow it as given.
///
/// # Errors
/// `InvalidChunkSize` for a zero size, `AddressNotFound` if an address has no
/// record in `records`
pub fn partition(
    addresses: &[Address],
    records: &ProofMap,
    chunk_size: usize,
) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(AllowlistError::InvalidChunkSize(chunk_size));
    }

    addresses
        .chunks(chunk_size)
        .map(|group| -> Result<Chunk> {
            let mut entries = ProofMap::new();
            for address in group {
                let key = address.to_lowercase_hex();
                let record = records
                    .get(&key)
                    .ok_or_else(|| AllowlistError::AddressNotFound(address.to_checksum()))?;
                entries.insert(key, record.clone());
            }
            // chunks() never yields an empty slice
            let key = group[group.len() - 1].to_lowercase_hex();
            Ok(Chunk { key, entries })
        })
        .collect()
}

/// Writes every chunk into `dir`, returning the written paths.
///
/// The directory is removed and recreated first. This is intentional: chunk
/// files from an earlier run must not be left beside the new ones, where a
/// consumer would take them for current data.
pub fn write_chunks(dir: &Path, chunks: &[Chunk]) -> Result<Vec<PathBuf>> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| AllowlistError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| AllowlistError::io(dir, e))?;

    let mut written = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let path = dir.join(chunk.file_name());
        let json = serde_json::to_string(&chunk.entries)?;
        fs::write(&path, json).map_err(|e| AllowlistError::io(&path, e))?;
        info!("Generated Merkle data chunk file: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Loads one chunk (or a whole-file dataset) back into memory.
pub fn read_chunk(path: &Path) -> Result<ProofMap> {
    let content = fs::read_to_string(path).map_err(|e| AllowlistError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Lists chunk keys found in `dir`, sorted ascending.
pub fn chunk_keys(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| AllowlistError::io(dir, e))?;
    let mut keys = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AllowlistError::io(dir, e))?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_ascii_lowercase());
            }
        }
    }
    keys.sort();
    Ok(keys)
}

/// Finds the key of the chunk that would hold `address`.
///
/// `keys` must be sorted. The answer is the first key not below the address;
/// `None` means the address sorts after every chunk.
pub fn find_chunk_key<'a>(keys: &'a [String], address: &Address) -> Option<&'a str> {
    let target = address.to_lowercase_hex();
    let index = keys.partition_point(|key| key.as_str() < target.as_str());
    keys.get(index).map(String::as_str)
}

/// Resolves the proof for `address` from a chunk directory.
pub fn lookup_proof(dir: &Path, address: &Address) -> Result<Vec<[u8; 32]>> {
    let not_found = || AllowlistError::AddressNotFound(address.to_checksum());

    let keys = chunk_keys(dir)?;
    let key = find_chunk_key(&keys, address).ok_or_else(not_found)?;
    let chunk = read_chunk(&dir.join(chunk_file_name(key)))?;
    chunk
        .get(&address.to_lowercase_hex())
        .ok_or_else(not_found)?
        .siblings()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_address(val: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[0] = val;
        Address::from_bytes(bytes)
    }

    fn fixture(n: u8) -> (Vec<Address>, ProofMap) {
        let addresses: Vec<Address> = (1..=n).map(make_address).collect();
        let records = addresses
            .iter()
            .map(|a| {
                let proof = [[a.as_bytes()[0]; 32]];
                (a.to_lowercase_hex(), ProofRecord::new(&proof, ProofEncoding::Joined))
            })
            .collect();
        (addresses, records)
    }

    #[test]
    fn test_record_joined_serialization() {
        let record = ProofRecord::new(&[[0x11u8; 32], [0x22u8; 32]], ProofEncoding::Joined);
        let json = serde_json::to_string(&record).unwrap();
        let expected = format!(
            "{{\"proof\":\"0x{},0x{}\"}}",
            "11".repeat(32),
            "22".repeat(32)
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_record_list_serialization() {
        let record = ProofRecord::new(&[[0x11u8; 32]], ProofEncoding::List);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, format!("{{\"proof\":[\"0x{}\"]}}", "11".repeat(32)));
    }

    #[test]
    fn test_record_siblings_from_either_encoding() {
        let proof = vec![[0x11u8; 32], [0x22u8; 32]];
        for encoding in [ProofEncoding::Joined, ProofEncoding::List] {
            let json = serde_json::to_string(&ProofRecord::new(&proof, encoding)).unwrap();
            let record: ProofRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(record.siblings().unwrap(), proof);
        }
    }

    #[test]
    fn test_empty_proof_record() {
        let record = ProofRecord::new(&[], ProofEncoding::Joined);
        assert_eq!(serde_json::to_string(&record).unwrap(), "{\"proof\":\"\"}");
        assert!(record.siblings().unwrap().is_empty());
    }

    #[test]
    fn test_partition_counts_and_keys() {
        let (addresses, records) = fixture(7);
        let chunks = partition(&addresses, &records, 3).unwrap();

        assert_eq!(chunks.len(), 3);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.entries.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(chunks[0].key, addresses[2].to_lowercase_hex());
        assert_eq!(chunks[1].key, addresses[5].to_lowercase_hex());
        assert_eq!(chunks[2].key, addresses[6].to_lowercase_hex());
        assert_eq!(chunks[2].file_name(), format!("{}.json", chunks[2].key));
    }

    #[test]
    fn test_partition_union_matches_records() {
        let (addresses, records) = fixture(10);
        let chunks = partition(&addresses, &records, 4).unwrap();

        let mut union = ProofMap::new();
        for chunk in chunks {
            for (key, record) in chunk.entries {
                assert_eq!(records.get(&key), Some(&record));
                assert!(union.insert(key, record).is_none(), "chunks overlap");
            }
        }
        assert_eq!(union, records);
    }

    #[test]
    fn test_partition_chunk_larger_than_list() {
        let (addresses, records) = fixture(2);
        let chunks = partition(&addresses, &records, 100).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].key, addresses[1].to_lowercase_hex());
    }

    #[test]
    fn test_partition_zero_chunk_size() {
        let (addresses, records) = fixture(2);
        assert!(matches!(
            partition(&addresses, &records, 0),
            Err(AllowlistError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn test_partition_missing_record() {
        let (addresses, mut records) = fixture(3);
        records.remove(&addresses[1].to_lowercase_hex());
        assert!(matches!(
            partition(&addresses, &records, 2),
            Err(AllowlistError::AddressNotFound(_))
        ));
    }

    #[test]
    fn test_find_chunk_key_boundaries() {
        let keys = vec![
            make_address(3).to_lowercase_hex(),
            make_address(6).to_lowercase_hex(),
        ];
        assert_eq!(find_chunk_key(&keys, &make_address(1)), Some(keys[0].as_str()));
        assert_eq!(find_chunk_key(&keys, &make_address(3)), Some(keys[0].as_str()));
        assert_eq!(find_chunk_key(&keys, &make_address(4)), Some(keys[1].as_str()));
        assert_eq!(find_chunk_key(&keys, &make_address(6)), Some(keys[1].as_str()));
        assert_eq!(find_chunk_key(&keys, &make_address(7)), None);
    }

    #[test]
    fn test_write_chunks_replaces_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("merkle_chunks");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("0xstale.json"), "{}").unwrap();

        let (addresses, records) = fixture(5);
        let chunks = partition(&addresses, &records, 2).unwrap();
        let written = write_chunks(&out, &chunks).unwrap();

        assert_eq!(written.len(), 3);
        assert!(!out.join("0xstale.json").exists());
        let keys = chunk_keys(&out).unwrap();
        let expected: Vec<String> = chunks.iter().map(|c| c.key.clone()).collect();
        assert_eq!(keys, expected);
        for chunk in &chunks {
            assert_eq!(read_chunk(&out.join(chunk.file_name())).unwrap(), chunk.entries);
        }
    }

    #[test]
    fn test_lookup_proof_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (addresses, records) = fixture(5);
        let chunks = partition(&addresses, &records, 2).unwrap();
        write_chunks(dir.path(), &chunks).unwrap();

        let proof = lookup_proof(dir.path(), &addresses[3]).unwrap();
        assert_eq!(proof, vec![[4u8; 32]]);
        assert!(matches!(
            lookup_proof(dir.path(), &make_address(9)),
            Err(AllowlistError::AddressNotFound(_))
        ));
    }
}
