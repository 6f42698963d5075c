use std::collections::HashSet;
use std::fmt;

use crate::common::keccak256;
use crate::error::{AllowlistError, Result};

/// A 20-byte Ethereum account address.
///
/// Ordering and equality are byte-wise, which matches case-insensitive
/// comparison of the hex forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase `0x` form, used for comparisons and as dataset keys.
    pub fn to_lowercase_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum form.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Merkle leaf for this address: keccak256 over the raw 20 bytes.
    pub fn leaf(&self) -> [u8; 32] {
        keccak256(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl std::str::FromStr for Address {
    type Err = AllowlistError;

    fn from_str(s: &str) -> Result<Self> {
        parse_address(s)
    }
}

/// Parses an Ethereum address from a hex string.
///
/// # Arguments
/// * `addr_str` - The address string, with or without "0x" prefix
///
/// # Errors
/// Returns `InvalidAddress` if the address is not 40 hex characters, or if it
/// is mixed-case and the casing is not a valid EIP-55 checksum
pub fn parse_address(addr_str: &str) -> Result<Address> {
    let invalid = |reason: &'static str| AllowlistError::InvalidAddress {
        value: addr_str.to_string(),
        reason,
    };

    let trimmed = addr_str.trim();
    let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if cleaned.len() != 40 {
        return Err(invalid("expected 40 hex chars"));
    }
    if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(cleaned, &mut bytes).map_err(|_| invalid("invalid hex encoding"))?;
    let address = Address(bytes);

    let has_upper = cleaned.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = cleaned.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower && address.to_checksum()[2..] != *cleaned {
        return Err(invalid("bad address checksum"));
    }

    Ok(address)
}

/// Validates and normalizes a list of raw address entries.
///
/// Input order is preserved. Duplicates are detected case-insensitively and
/// reported with the repeated entry as it was written.
pub fn load_addresses<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Address>> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut addresses = Vec::with_capacity(entries.len());

    for entry in entries {
        let entry = entry.as_ref();
        let address = parse_address(entry)?;
        if !seen.insert(address) {
            return Err(AllowlistError::DuplicateAddress(entry.trim().to_string()));
        }
        addresses.push(address);
    }

    Ok(addresses)
}
