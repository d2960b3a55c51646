//! Ledger configuration
//!
//! Both ledgers are built from a plain configuration struct. Configs can be
//! constructed in code or loaded from JSON; they are consumed at construction
//! and never mutated afterwards.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::numeric::Amount;

/// Token ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Human-readable token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display decimals. Balances are always stored in base units.
    pub decimals: u8,
    /// Supply minted to the deployer at construction.
    pub initial_supply: Amount,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "xToken".to_string(),
            symbol: "XTK".to_string(),
            decimals: 0,
            initial_supply: 10_000_000,
        }
    }
}

impl TokenConfig {
    pub fn with_supply(initial_supply: Amount) -> Self {
        Self {
            initial_supply,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Escrow ledger configuration.
///
/// `owner` and `resolver` are the two authority roles; `token_address` is the
/// only token ledger the escrow will ever pull from or pay out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    pub owner: Address,
    pub resolver: Address,
    pub token_address: Address,
}

impl EscrowConfig {
    /// Deployer holds both roles.
    pub fn new(deployer: Address, token_address: Address) -> Self {
        Self {
            owner: deployer,
            resolver: deployer,
            token_address,
        }
    }

    /// Hand the resolver role to a separate arbitrator.
    pub fn with_resolver(mut self, resolver: Address) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
