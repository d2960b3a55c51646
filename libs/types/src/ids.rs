//! Identifier types for ledger entities
//!
//! Accounts (externally owned or contract) are 20-byte addresses and escrow
//! agreements are keyed by caller-chosen 32-byte identifiers. Both travel as
//! `0x`-prefixed hex text on the wire and in serialized events.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::errors::IdError;

/// Strip an optional `0x`/`0X` prefix.
fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Account address
///
/// Identifies token holders, spenders and deployed ledgers alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Address length in bytes
    pub const LEN: usize = 20;

    /// The zero address, used as the source of minted supply.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Derive the address of a ledger deployed by `deployer`.
    ///
    /// The address is the last 20 bytes of `SHA-256(deployer || nonce)` with
    /// the nonce big-endian encoded, so each (deployer, nonce) pair yields a
    /// distinct, reproducible address.
    pub fn derive(deployer: &Address, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(deployer.0);
        hasher.update(nonce.to_be_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Parse from hex text, with or without the `0x` prefix.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let digits = strip_hex_prefix(s.trim());
        if digits.is_empty() {
            return Err(IdError::Empty);
        }
        let raw = hex::decode(digits)?;
        let bytes: [u8; 20] = raw.as_slice().try_into().map_err(|_| IdError::InvalidLength {
            expected: Self::LEN,
            actual: raw.len(),
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

/// Escrow agreement identifier
///
/// A fixed 32-byte opaque value chosen by the depositor. An empty, short,
/// long or all-zero value is never a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EscrowId([u8; 32]);

impl EscrowId {
    /// Identifier length in bytes
    pub const LEN: usize = 32;

    /// Build from raw bytes, rejecting the all-zero value.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, IdError> {
        if bytes == [0u8; 32] {
            return Err(IdError::Zero);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Decode from hex text, with or without the `0x` prefix.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let digits = strip_hex_prefix(s.trim());
        if digits.is_empty() {
            return Err(IdError::Empty);
        }
        let raw = hex::decode(digits)?;
        let bytes: [u8; 32] = raw.as_slice().try_into().map_err(|_| IdError::InvalidLength {
            expected: Self::LEN,
            actual: raw.len(),
        })?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for EscrowId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EscrowId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EscrowId> for String {
    fn from(id: EscrowId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AGREEMENT_ID: &str =
        "0x5d3d8741c1e0b2f4a9d6e3b7c8f1a2d5e4b9c6f3a8d7e2b1c4f5a6d9e0b3da31";

    #[test]
    fn test_address_parse_and_display() {
        let addr = Address::parse("0x854880dB37EEb4feE281933006440FdB607c576f").unwrap();
        assert_eq!(addr.to_string(), "0x854880db37eeb4fee281933006440fdb607c576f");
    }

    #[test]
    fn test_address_parse_without_prefix() {
        let a = Address::parse("16eb958722991e3685bd113ed958f9872a4533e7").unwrap();
        let b: Address = "0x16EB958722991e3685bD113eD958F9872a4533e7".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert_eq!(Address::parse(""), Err(IdError::Empty));
        assert_eq!(Address::parse("0x"), Err(IdError::Empty));
        assert_eq!(
            Address::parse("0xabcd"),
            Err(IdError::InvalidLength {
                expected: 20,
                actual: 2
            })
        );
        assert!(matches!(Address::parse("0xzz"), Err(IdError::InvalidHex(_))));
    }

    #[test]
    fn test_address_derive_is_deterministic() {
        let deployer = Address::from_bytes([7u8; 20]);
        assert_eq!(Address::derive(&deployer, 0), Address::derive(&deployer, 0));
        assert_ne!(Address::derive(&deployer, 0), Address::derive(&deployer, 1));
        assert_ne!(Address::derive(&deployer, 0), deployer);
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::from_bytes([0xab; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr));
        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_escrow_id_parse() {
        let id = EscrowId::parse(AGREEMENT_ID).unwrap();
        assert_eq!(id.as_bytes()[0], 0x5d);
        assert_eq!(id.as_bytes()[31], 0x31);
        assert_eq!(id.to_string(), AGREEMENT_ID);
    }

    #[test]
    fn test_escrow_id_empty_rejected() {
        assert_eq!(EscrowId::parse(""), Err(IdError::Empty));
        assert_eq!(EscrowId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_escrow_id_wrong_length_rejected() {
        assert_eq!(
            EscrowId::parse("0x5d3d8741"),
            Err(IdError::InvalidLength {
                expected: 32,
                actual: 4
            })
        );
    }

    #[test]
    fn test_escrow_id_zero_rejected() {
        let zeroes = format!("0x{}", "00".repeat(32));
        assert_eq!(EscrowId::parse(&zeroes), Err(IdError::Zero));
        assert_eq!(EscrowId::from_bytes([0u8; 32]), Err(IdError::Zero));
    }

    #[test]
    fn test_escrow_id_deserialize_rejects_malformed() {
        let result: Result<EscrowId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_escrow_id_text_form_is_stable(bytes in proptest::array::uniform32(1u8..=255)) {
            let id = EscrowId::from_bytes(bytes).unwrap();
            prop_assert_eq!(EscrowId::parse(&id.to_string()).unwrap(), id);
        }
    }
}
