//! Token amount representation
//!
//! Balances, allowances and escrowed amounts are unsigned integers in the
//! token's smallest unit. There is no fractional arithmetic anywhere in the
//! ledgers, so a plain `u128` is used and every mutation is checked.

/// A quantity of tokens in base units.
pub type Amount = u128;

/// Release time value meaning "no time lock".
pub const NO_TIME_LOCK: u64 = 0;
