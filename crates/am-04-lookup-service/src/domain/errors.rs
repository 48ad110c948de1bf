//! # Lookup Errors

use shared_types::KVStoreError;
use thiserror::Error;

/// Errors raised by the advertisement store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key-value store error: {0}")]
    Store(#[from] KVStoreError),

    #[error("Corrupt record at {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// Errors returned from `lookup`.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup service not supported: {0}")]
    UnsupportedService(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
