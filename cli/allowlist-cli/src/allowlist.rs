use crate::address::{load_addresses, Address};
use crate::chunk::{partition, Chunk, ProofEncoding, ProofMap, ProofRecord};
use crate::common::hex_encode;
use crate::error::{AllowlistError, Result};
use crate::tree::MerkleTree;

/// A validated allowlist: addresses in canonical order plus their tree.
#[derive(Debug, Clone)]
pub struct Allowlist {
    addresses: Vec<Address>,
    tree: MerkleTree,
}

impl Allowlist {
    /// Validates raw entries, rejects duplicates and builds the tree.
    ///
    /// Any invalid or repeated entry aborts the whole build.
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        Self::from_addresses(load_addresses(entries)?)
    }

    pub fn from_addresses(mut addresses: Vec<Address>) -> Result<Self> {
        addresses.sort_unstable();
        let tree = MerkleTree::from_addresses(&addresses)?;
        Ok(Self { addresses, tree })
    }

    /// Addresses sorted ascending by their lowercase form.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    pub fn root(&self) -> [u8; 32] {
        self.tree.root()
    }

    pub fn root_hex(&self) -> String {
        hex_encode(self.tree.root())
    }

    pub fn proof(&self, address: &Address) -> Result<Vec<[u8; 32]>> {
        self.tree.proof(address)
    }

    /// Fails if any account of a multi-address list ends up with no proof.
    pub fn ensure_proofs(&self) -> Result<()> {
        if self.addresses.len() < 2 {
            return Ok(());
        }
        for address in &self.addresses {
            if self.tree.proof(address)?.is_empty() {
                return Err(AllowlistError::AddressNotFound(address.to_checksum()));
            }
        }
        Ok(())
    }

    /// The full dataset: lowercase address -> proof record.
    pub fn proof_records(&self, encoding: ProofEncoding) -> Result<ProofMap> {
        self.addresses
            .iter()
            .map(|address| -> Result<(String, ProofRecord)> {
                let proof = self.tree.proof(address)?;
                Ok((address.to_lowercase_hex(), ProofRecord::new(&proof, encoding)))
            })
            .collect()
    }

    pub fn chunks(&self, chunk_size: usize, encoding: ProofEncoding) -> Result<Vec<Chunk>> {
        if chunk_size == 0 {
            return Err(AllowlistError::InvalidChunkSize(chunk_size));
        }
        let records = self.proof_records(encoding)?;
        partition(&self.addresses, &records, chunk_size)
    }
}
