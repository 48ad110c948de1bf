//! # Codec Errors

use am_01_transaction_bundle::ScriptError;
use thiserror::Error;

/// Errors produced while decoding a PushDrop script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushDropError {
    #[error("Malformed script: {0}")]
    Script(#[from] ScriptError),

    #[error("Script does not start with a 33-byte key push")]
    MissingLockingKey,

    #[error("Locking key is not a valid compressed secp256k1 point")]
    InvalidLockingKey,

    #[error("Expected OP_CHECKSIG after the locking key, found {0:#04x}")]
    MissingChecksig(u8),
}

/// Errors produced while reading advertisement fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Advertisement token needs at least {expected} fields, got {actual}")]
    TooFewFields { expected: usize, actual: usize },

    #[error("Protocol marker mismatch: {0:?}")]
    MarkerMismatch(String),

    #[error("Field {index} ({name}) is not valid UTF-8")]
    InvalidUtf8 { index: usize, name: &'static str },

    #[error("Invalid end date {0:?}")]
    InvalidEndDate(String),

    #[error("Invalid reward per answer {0:?}")]
    InvalidReward(String),
}
