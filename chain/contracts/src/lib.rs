//! Token Custody Contracts
//!
//! This crate implements the ledger layer of the escrow service: a fungible
//! token ledger supplying balances and allowances, and an escrow ledger that
//! locks tokens under caller-chosen identifiers until they are released.
//!
//! # Modules
//! - `config`: Token and escrow configuration
//! - `events`: Token and escrow events
//! - `errors`: Contract-specific error types
//! - `security`: Reentrancy guard and the fixed role table
//! - `token`: Token ledger capability and in-process implementation
//! - `escrow`: Agreement creation, release, refund and arbitration
//! - `policy`: Pluggable arbitration policies for the resolver
//!
//! # Version
//! v0.1.0

pub mod config;
pub mod errors;
pub mod events;
pub mod security;
pub mod token;
pub mod escrow;
pub mod policy;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
