pub mod address;
pub mod allowlist;
pub mod chunk;
pub mod common;
pub mod error;
pub mod tree;

pub use address::{load_addresses, parse_address, Address};
pub use allowlist::Allowlist;
pub use chunk::{
    find_chunk_key, lookup_proof, partition, read_chunk, write_chunks, Chunk, ProofEncoding,
    ProofMap, ProofRecord,
};
pub use common::{
    format_proof, hash_sorted_pair, hex_encode, keccak256, parse_hash, parse_proof,
    read_entries, write_file_atomic,
};
pub use error::{AllowlistError, Result};
pub use tree::{verify_proof, MerkleTree};
