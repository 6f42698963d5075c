use anyhow::Context;
use sha3::{Digest, Keccak256};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{AllowlistError, Result};

/// Computes the Keccak256 hash of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hashes two 32-byte nodes after ordering them byte-wise.
///
/// The smaller value is always hashed first, so `hash_sorted_pair(a, b)`
/// equals `hash_sorted_pair(b, a)` and proofs carry no left/right flags.
///
/// # Arguments
/// * `a` - First 32-byte node
/// * `b` - Second 32-byte node
///
/// # Returns
/// 32-byte hash of the ordered concatenation
pub fn hash_sorted_pair(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    let hash = Keccak256::new()
        .chain_update(left)
        .chain_update(right)
        .finalize();
    hash.into()
}

/// Renders bytes as a `0x`-prefixed lowercase hex string.
pub fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses a 32-byte hash from a hex string, with or without "0x" prefix.
///
/// # Errors
/// Returns `InvalidHash` if the value is not 64 hex characters
pub fn parse_hash(hash_str: &str) -> Result<[u8; 32]> {
    let trimmed = hash_str.trim();
    let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if cleaned.len() != 64 {
        return Err(AllowlistError::InvalidHash {
            value: hash_str.to_string(),
            reason: format!("expected 64 hex chars, got {}", cleaned.len()),
        });
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut hash).map_err(|e| AllowlistError::InvalidHash {
        value: hash_str.to_string(),
        reason: e.to_string(),
    })?;
    Ok(hash)
}

/// Joins proof siblings into the comma-separated string form.
pub fn format_proof(proof: &[[u8; 32]]) -> String {
    proof.iter().map(hex_encode).collect::<Vec<_>>().join(",")
}

/// Parses a comma-separated proof string. An empty string is an empty proof.
pub fn parse_proof(proof_str: &str) -> Result<Vec<[u8; 32]>> {
    if proof_str.trim().is_empty() {
        return Ok(Vec::new());
    }
    proof_str.split(',').map(parse_hash).collect()
}

/// Reads address entries from a delimited text file, one entry per line.
///
/// Blank lines are skipped. Each remaining line is returned trimmed and
/// otherwise untouched; validation happens when the entries are loaded.
pub fn read_entries(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open address file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        entries.push(trimmed.to_string());
    }
    Ok(entries)
}

/// Writes `contents` to a sibling temp file and renames it over `path`.
pub fn write_file_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).context("Failed to create temp file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write to temp file")?;
    file.flush().context("Failed to flush temp file")?;
    std::fs::rename(&temp_path, path).context("Failed to move temp file to output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_input() {
        assert_eq!(
            hex_encode(keccak256(&[])),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_sorted_pair_is_commutative() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_sorted_pair(a, b), hash_sorted_pair(b, a));
    }

    #[test]
    fn test_hash_sorted_pair_hashes_smaller_first() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let mut concat = Vec::with_capacity(64);
        concat.extend_from_slice(&a);
        concat.extend_from_slice(&b);
        assert_eq!(hash_sorted_pair(b, a), keccak256(&concat));
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode([0xabu8, 0x01]), "0xab01");
    }

    #[test]
    fn test_parse_hash_with_and_without_prefix() {
        let hex = "11".repeat(32);
        assert_eq!(parse_hash(&hex).unwrap(), [0x11u8; 32]);
        assert_eq!(parse_hash(&format!("0x{hex}")).unwrap(), [0x11u8; 32]);
    }

    #[test]
    fn test_parse_hash_invalid_length() {
        assert!(matches!(
            parse_hash("0x1234"),
            Err(AllowlistError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_parse_hash_invalid_hex() {
        let bad = format!("0x{}", "zz".repeat(32));
        assert!(parse_hash(&bad).is_err());
    }

    #[test]
    fn test_format_and_parse_proof() {
        let proof = vec![[0xaau8; 32], [0xbbu8; 32]];
        let joined = format_proof(&proof);
        assert_eq!(joined.matches(',').count(), 1);
        assert!(joined.starts_with("0xaaaa"));
        assert_eq!(parse_proof(&joined).unwrap(), proof);
    }

    #[test]
    fn test_parse_proof_empty() {
        assert!(parse_proof("").unwrap().is_empty());
        assert_eq!(format_proof(&[]), "");
    }

    #[test]
    fn test_read_entries_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        std::fs::write(&path, "0xabc\n\n  0xdef  \n\n").unwrap();
        let entries = read_entries(&path).unwrap();
        assert_eq!(entries, vec!["0xabc".to_string(), "0xdef".to_string()]);
    }

    #[test]
    fn test_read_entries_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_write_file_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_file_atomic(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("tmp").exists());
    }
}
