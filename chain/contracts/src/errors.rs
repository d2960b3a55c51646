//! Contract-specific error types
//!
//! Error taxonomy for the token ledger and the escrow ledger. Every variant is
//! a synchronous rejection: the ledger that returns it has not changed state.

use thiserror::Error;
use types::errors::IdError;
use types::ids::{Address, EscrowId};
use types::numeric::Amount;

/// Token ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Insufficient allowance: {spender} may spend {available} of {owner}'s tokens, required {required}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Escrow ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EscrowError {
    #[error("Malformed escrow identifier: {0}")]
    MalformedIdentifier(#[from] IdError),

    #[error("Escrow identifier already used: {id}")]
    DuplicateIdentifier { id: EscrowId },

    #[error("Funding failed: {0}")]
    FundingFailed(#[source] TokenError),

    #[error("Escrow amount must be positive")]
    InvalidAmount,

    #[error("Invalid beneficiary: {beneficiary}")]
    InvalidBeneficiary { beneficiary: Address },

    #[error("Escrow not found: {id}")]
    NotFound { id: EscrowId },

    #[error("Escrow already settled: {id}")]
    AlreadySettled { id: EscrowId },

    #[error("Escrow locked until {release_time}, current time {now}")]
    StillLocked { release_time: u64, now: u64 },

    #[error("Unauthorized: {caller} does not hold the required role")]
    Unauthorized { caller: Address },

    #[error("Settlement transfer failed: {0}")]
    SettlementFailed(#[source] TokenError),

    #[error("Token ledger mismatch: configured {expected}, supplied {actual}")]
    TokenMismatch { expected: Address, actual: Address },

    /// Raised if a mutating call starts while another holds the guard.
    /// Exclusive borrows make this unreachable from safe code today.
    #[error("Reentrancy detected")]
    Reentrancy,
}
