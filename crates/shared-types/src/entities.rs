//! # Core Overlay Entities
//!
//! Identifiers shared by the admission filter, the lookup index and the
//! campaign backend.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TxidParseError;

/// Amount of satoshis.
pub type Satoshis = u64;

/// Position of an output inside its transaction.
pub type OutputIndex = u32;

/// A transaction id.
///
/// Bytes are kept in display order: the double SHA-256 of the raw
/// transaction, reversed. `to_string()` therefore yields the familiar
/// explorer hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Txid(pub [u8; 32]);

impl Txid {
    /// Build from a hash in internal (wire) byte order.
    pub fn from_wire_hash(hash: [u8; 32]) -> Self {
        let mut bytes = hash;
        bytes.reverse();
        Self(bytes)
    }

    /// Bytes in internal (wire) order, as they appear in outpoints.
    pub fn to_wire_hash(&self) -> [u8; 32] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Txid({})", self.to_hex())
    }
}

impl FromStr for Txid {
    type Err = TxidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| TxidParseError::InvalidHex(s.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| TxidParseError::InvalidLength(v.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Txid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Txid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Reference to a single transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoReference {
    pub txid: Txid,
    pub output_index: OutputIndex,
}

impl UtxoReference {
    pub fn new(txid: Txid, output_index: OutputIndex) -> Self {
        Self { txid, output_index }
    }
}

impl fmt::Display for UtxoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.txid, self.output_index)
    }
}
