//! # Transaction Bundle Codec (am-01)
//!
//! Reads the transaction containers the overlay network hands to topic
//! managers: raw transactions, BEEF bundles and Atomic BEEF.
//!
//! ## Supported Formats
//!
//! | Format | Prefix (LE u32) | Notes |
//! |--------|-----------------|-------|
//! | BEEF V1 (BRC-62) | `0100BEEF` | raw tx + optional bump index |
//! | BEEF V2 (BRC-96) | `0200BEEF` | per-tx format byte, txid-only entries |
//! | Atomic BEEF (BRC-95) | `01010101` | subject txid, then a V1/V2 bundle |
//!
//! Merkle paths (BUMPs) are parsed so the bundle can be walked and
//! re-emitted, but never verified. Proof checking belongs to the hosting node.
//!
//! ## Usage
//!
//! ```ignore
//! use am_01_transaction_bundle::Transaction;
//!
//! let tx = Transaction::from_beef(&beef_bytes)?;
//! for (index, output) in tx.outputs.iter().enumerate() {
//!     println!("{index}: {}", output.locking_script.to_hex());
//! }
//! ```

pub mod domain;

pub use domain::{
    beef::{Beef, BeefTransaction, MerklePath, PathLeaf, ATOMIC_BEEF, BEEF_V1, BEEF_V2},
    codec::{write_varint, ByteReader},
    errors::{BundleError, ScriptError},
    script::{opcodes, LockingScript, ScriptChunk},
    transaction::{Transaction, TransactionInput, TransactionOutput},
};
