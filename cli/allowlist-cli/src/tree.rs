use std::collections::HashMap;

use tracing::debug;

use crate::address::Address;
use crate::common::hash_sorted_pair;
use crate::error::{AllowlistError, Result};

/// Binary keccak256 Merkle tree over a set of addresses.
///
/// Leaves are sorted by hash and sibling pairs are sorted before hashing, so
/// the root depends only on the address set. An unpaired node at the end of a
/// level is promoted unchanged to the next level.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<[u8; 32]>>,
    leaf_index: HashMap<Address, usize>,
}

impl MerkleTree {
    /// Builds the tree from a set of addresses in any order.
    ///
    /// # Errors
    /// `EmptyAllowlist` for no addresses, `DuplicateAddress` if the same
    /// address appears twice
    pub fn from_addresses(addresses: &[Address]) -> Result<Self> {
        if addresses.is_empty() {
            return Err(AllowlistError::EmptyAllowlist);
        }

        let mut leaves: Vec<([u8; 32], Address)> =
            addresses.iter().map(|addr| (addr.leaf(), *addr)).collect();
        leaves.sort_unstable();

        let mut leaf_index = HashMap::with_capacity(leaves.len());
        for (index, (_, addr)) in leaves.iter().enumerate() {
            if leaf_index.insert(*addr, index).is_some() {
                return Err(AllowlistError::DuplicateAddress(addr.to_checksum()));
            }
        }

        let layers = build_layers(leaves.into_iter().map(|(leaf, _)| leaf).collect());
        debug!(
            leaves = leaf_index.len(),
            depth = layers.len() - 1,
            "built merkle tree"
        );

        Ok(Self { layers, leaf_index })
    }

    pub fn root(&self) -> [u8; 32] {
        // from_addresses guarantees a non-empty top layer
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Node layers from leaves (index 0) up to the root.
    pub fn layers(&self) -> &[Vec<[u8; 32]>] {
        &self.layers
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.leaf_index.contains_key(address)
    }

    /// Generates the inclusion proof for `address`.
    ///
    /// Siblings are ordered from the leaf level upward. Levels where the node
    /// was promoted without a sibling contribute nothing.
    ///
    /// # Errors
    /// `AddressNotFound` if the address is not part of the tree
    pub fn proof(&self, address: &Address) -> Result<Vec<[u8; 32]>> {
        let leaf_index = *self
            .leaf_index
            .get(address)
            .ok_or_else(|| AllowlistError::AddressNotFound(address.to_checksum()))?;

        let mut proof = Vec::with_capacity(self.depth());
        let mut index = leaf_index;

        for level in &self.layers[..self.layers.len() - 1] {
            let sibling_index = if index.is_multiple_of(2) {
                index + 1
            } else {
                index - 1
            };
            if let Some(sibling) = level.get(sibling_index) {
                proof.push(*sibling);
            }
            index /= 2;
        }

        Ok(proof)
    }
}

fn build_layers(leaves: Vec<[u8; 32]>) -> Vec<Vec<[u8; 32]>> {
    let mut layers = vec![leaves];

    while layers[layers.len() - 1].len() > 1 {
        let level = &layers[layers.len() - 1];
        let next_level: Vec<[u8; 32]> = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hash_sorted_pair(*left, *right),
                [odd] => *odd,
                _ => unreachable!("chunks(2) yields one or two nodes"),
            })
            .collect();
        layers.push(next_level);
    }

    layers
}

/// Checks that `proof` links `address` to `root` under the sorted-pair rule.
///
/// Needs no tree: only the address, the sibling list and the expected root.
pub fn verify_proof(address: &Address, proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
    let computed = proof
        .iter()
        .fold(address.leaf(), |node, sibling| hash_sorted_pair(node, *sibling));
    computed == *root
}
