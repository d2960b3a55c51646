//! Error types for identifier decoding

use thiserror::Error;

/// Reasons a textual address or escrow identifier fails to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("identifier must not be all zeroes")]
    Zero,
}

impl From<hex::FromHexError> for IdError {
    fn from(err: hex::FromHexError) -> Self {
        IdError::InvalidHex(err.to_string())
    }
}
