//! Contract events
//!
//! Events are immutable records emitted by ledger operations. Token events
//! keep the conventional fungible-token field names (`_owner`, `_spender`,
//! `_value`, ...) in their serialized form so off-chain indexers can read
//! them without a translation layer.

use serde::{Deserialize, Serialize};
use types::ids::{Address, EscrowId};
use types::numeric::Amount;

/// Allowance set by an owner for a spender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(rename = "_owner")]
    pub owner: Address,
    #[serde(rename = "_spender")]
    pub spender: Address,
    #[serde(rename = "_value")]
    pub value: Amount,
}

/// Tokens moved between accounts (minting uses the zero address as `from`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(rename = "_from")]
    pub from: Address,
    #[serde(rename = "_to")]
    pub to: Address,
    #[serde(rename = "_value")]
    pub value: Amount,
}

/// Token ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    Approval(Approval),
    Transfer(Transfer),
}

/// New agreement funded and recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowCreated {
    pub id: EscrowId,
    pub depositor: Address,
    pub beneficiary: Address,
    pub amount: Amount,
    pub release_time: u64,
}

/// Held funds paid out to the beneficiary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowReleased {
    pub id: EscrowId,
    pub beneficiary: Address,
    pub amount: Amount,
    pub released_by: Address,
}

/// Held funds returned to the depositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRefunded {
    pub id: EscrowId,
    pub depositor: Address,
    pub amount: Amount,
    pub refunded_by: Address,
}

/// Escrow ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEvent {
    Created(EscrowCreated),
    Released(EscrowReleased),
    Refunded(EscrowRefunded),
}
