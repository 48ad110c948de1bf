//! # Error Types
//!
//! Errors shared across subsystems.

use thiserror::Error;

/// Errors from a `KeyValueStore` adapter.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// Underlying database I/O failed.
    #[error("I/O error: {message}")]
    IOError { message: String },

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// The store is closed or otherwise unavailable.
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

/// Failure to parse a textual transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxidParseError {
    #[error("txid is not valid hex: {0}")]
    InvalidHex(String),

    #[error("txid must be 32 bytes, got {0}")]
    InvalidLength(usize),
}
