//! # Transactions
//!
//! Standard raw transaction layout:
//!
//! ```text
//! version:u32 | n_in:varint | inputs | n_out:varint | outputs | lock_time:u32
//! input  = prev_txid:[u8;32] | prev_vout:u32 | script:var_bytes | sequence:u32
//! output = satoshis:u64 | script:var_bytes
//! ```

use sha2::{Digest, Sha256};
use shared_types::{OutputIndex, Satoshis, Txid};

use crate::domain::beef::Beef;
use crate::domain::codec::{write_var_bytes, write_varint, ByteReader};
use crate::domain::errors::BundleError;
use crate::domain::script::LockingScript;

/// Minimum encoded size of an input (32 + 4 + 1 + 4).
const MIN_INPUT_SIZE: usize = 41;
/// Minimum encoded size of an output (8 + 1).
const MIN_OUTPUT_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub source_txid: Txid,
    pub source_output_index: OutputIndex,
    pub unlocking_script: Vec<u8>,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub satoshis: Satoshis,
    pub locking_script: LockingScript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Transaction {
    /// Parse a complete raw transaction; trailing bytes are rejected.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, BundleError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read(&mut reader)?;
        if !reader.is_empty() {
            return Err(BundleError::TrailingBytes(reader.remaining()));
        }
        Ok(tx)
    }

    /// Parse the subject transaction of a BEEF or Atomic BEEF bundle.
    pub fn from_beef(bytes: &[u8]) -> Result<Self, BundleError> {
        let beef = Beef::from_bytes(bytes)?;
        beef.subject_transaction().cloned()
    }

    /// Read one transaction from the reader's current position.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, BundleError> {
        let version = reader.read_u32_le()?;

        let input_count = reader.read_count("input", MIN_INPUT_SIZE)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            let source_txid = Txid::from_wire_hash(reader.read_array()?);
            let source_output_index = reader.read_u32_le()?;
            let unlocking_script = reader.read_var_bytes()?.to_vec();
            let sequence = reader.read_u32_le()?;
            inputs.push(TransactionInput {
                source_txid,
                source_output_index,
                unlocking_script,
                sequence,
            });
        }

        let output_count = reader.read_count("output", MIN_OUTPUT_SIZE)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let satoshis = reader.read_u64_le()?;
            let locking_script = LockingScript::from_bytes(reader.read_var_bytes()?);
            outputs.push(TransactionOutput {
                satoshis,
                locking_script,
            });
        }

        let lock_time = reader.read_u32_le()?;

        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());

        write_varint(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            out.extend_from_slice(&input.source_txid.to_wire_hash());
            out.extend_from_slice(&input.source_output_index.to_le_bytes());
            write_var_bytes(&mut out, &input.unlocking_script);
            out.extend_from_slice(&input.sequence.to_le_bytes());
        }

        write_varint(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.satoshis.to_le_bytes());
            write_var_bytes(&mut out, output.locking_script.as_bytes());
        }

        out.extend_from_slice(&self.lock_time.to_le_bytes());
        out
    }

    /// Transaction id of this transaction's canonical encoding.
    pub fn id(&self) -> Txid {
        txid_of_raw(&self.to_bytes())
    }

    pub fn total_output_satoshis(&self) -> Satoshis {
        self.outputs.iter().map(|o| o.satoshis).sum()
    }
}

/// Double SHA-256 of raw transaction bytes, as a display-order txid.
pub fn txid_of_raw(raw: &[u8]) -> Txid {
    let first = Sha256::digest(raw);
    let second = Sha256::digest(first);
    Txid::from_wire_hash(second.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TransactionInput {
                source_txid: Txid([0x11; 32]),
                source_output_index: 2,
                unlocking_script: vec![0x51],
                sequence: 0xffff_ffff,
            }],
            outputs: vec![
                TransactionOutput {
                    satoshis: 1,
                    locking_script: LockingScript::from_hex("76a914").unwrap(),
                },
                TransactionOutput {
                    satoshis: 5000,
                    locking_script: LockingScript::default(),
                },
            ],
            lock_time: 0,
        }
    }

    #[test]
    fn test_raw_roundtrip() {
        let tx = sample_tx();
        let parsed = Transaction::from_raw(&tx.to_bytes()).unwrap();
        assert_eq!(parsed, tx);
        assert_eq!(parsed.total_output_satoshis(), 5001);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut raw = sample_tx().to_bytes();
        raw.push(0);
        assert_eq!(Transaction::from_raw(&raw), Err(BundleError::TrailingBytes(1)));
    }

    #[test]
    fn test_truncated_raw_rejected() {
        let raw = sample_tx().to_bytes();
        for cut in [0, 3, 10, raw.len() - 1] {
            assert!(Transaction::from_raw(&raw[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn test_genesis_coinbase_txid() {
        // Bitcoin genesis block coinbase.
        let raw = hex::decode(concat!(
            "01000000010000000000000000000000000000000000000000000000000000000000000000",
            "ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368",
            "616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420",
            "666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1",
            "a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112",
            "de5c384df7ba0b8d578a4c702b6bf11d5fac00000000"
        ))
        .unwrap();
        let tx = Transaction::from_raw(&raw).unwrap();
        assert_eq!(
            tx.id().to_string(),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );
        assert_eq!(tx.outputs[0].satoshis, 50 * 100_000_000);
    }
}
