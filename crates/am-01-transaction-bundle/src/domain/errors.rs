//! # Domain Errors

use shared_types::Txid;
use thiserror::Error;

/// Errors produced while reading a transaction or bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Unknown bundle version: {0:#010x}")]
    UnknownVersion(u32),

    #[error("{what} count {count} exceeds remaining input")]
    CountTooLarge { what: &'static str, count: u64 },

    #[error("Invalid transaction format byte: {0}")]
    InvalidTxFormat(u8),

    #[error("Bump index {index} out of range ({bumps} bumps)")]
    InvalidBumpIndex { index: u64, bumps: usize },

    #[error("Merkle path tree height {0} exceeds 64")]
    InvalidTreeHeight(u8),

    #[error("Bundle contains no transactions")]
    EmptyBundle,

    #[error("Subject transaction {0} not found in bundle")]
    SubjectNotFound(Txid),

    #[error("Subject transaction {0} is present only as a txid")]
    SubjectTxidOnly(Txid),

    #[error("{0} trailing bytes after end of data")]
    TrailingBytes(usize),
}

/// Errors produced while splitting a script into chunks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("Push at offset {offset} needs {needed} bytes, {available} available")]
    TruncatedPush {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid script hex: {0}")]
    InvalidHex(String),
}
