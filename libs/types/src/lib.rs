//! Types library for the token custody ledgers
//!
//! Core type definitions shared by the token ledger and the escrow ledger,
//! ensuring both sides agree on how accounts and agreements are identified.
//!
//! # Version
//! v1.0.0
//!
//! # Modules
//! - `ids`: Account addresses and escrow agreement identifiers
//! - `numeric`: Token amount representation
//! - `errors`: Identifier decoding errors

// Public modules
pub mod ids;
pub mod numeric;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::errors::*;
}
