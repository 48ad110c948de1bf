//! # BEEF Bundles
//!
//! A BEEF bundle carries a transaction together with its unconfirmed
//! ancestors and the merkle paths (BUMPs) anchoring the confirmed ones.
//!
//! ```text
//! [ATOMIC_BEEF:u32 subject_txid:[u8;32]]?    (txids in wire order)
//! version:u32 | n_bumps:varint | bumps | n_txs:varint | txs
//!
//! V1 tx = raw_tx | has_bump:u8 | [bump_index:varint]?
//! V2 tx = format:u8 | ( txid:[u8;32]                 format 2
//!                     | [bump_index:varint]? raw_tx )  format 0 / 1
//! ```
//!
//! Transactions appear in dependency order, so the subject of a plain BEEF
//! is the last entry.

use shared_types::Txid;
use tracing::{debug, trace};

use crate::domain::codec::{write_varint, ByteReader};
use crate::domain::errors::BundleError;
use crate::domain::transaction::{txid_of_raw, Transaction};

/// BRC-62 version marker (`0100BEEF` on the wire).
pub const BEEF_V1: u32 = 0xEFBE_0001;
/// BRC-96 version marker (`0200BEEF` on the wire).
pub const BEEF_V2: u32 = 0xEFBE_0002;
/// BRC-95 Atomic BEEF prefix.
pub const ATOMIC_BEEF: u32 = 0x0101_0101;

const MAX_TREE_HEIGHT: u8 = 64;

const FORMAT_RAW_TX: u8 = 0;
const FORMAT_RAW_TX_AND_BUMP: u8 = 1;
const FORMAT_TXID_ONLY: u8 = 2;

const LEAF_FLAG_DUPLICATE: u8 = 0x01;
const LEAF_FLAG_TXID: u8 = 0x02;

/// One node of a merkle path level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLeaf {
    pub offset: u64,
    /// Node hash in wire order; `None` when the node duplicates its sibling.
    pub hash: Option<[u8; 32]>,
    /// Whether this leaf is a transaction the bundle is about.
    pub txid: bool,
}

/// BRC-74 merkle path. Parsed for structure only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    pub block_height: u64,
    pub levels: Vec<Vec<PathLeaf>>,
}

impl MerklePath {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, BundleError> {
        let block_height = reader.read_varint()?;
        let tree_height = reader.read_u8()?;
        if tree_height > MAX_TREE_HEIGHT {
            return Err(BundleError::InvalidTreeHeight(tree_height));
        }

        let mut levels = Vec::with_capacity(tree_height as usize);
        for _ in 0..tree_height {
            let leaf_count = reader.read_count("merkle leaf", 2)?;
            let mut leaves = Vec::with_capacity(leaf_count);
            for _ in 0..leaf_count {
                let offset = reader.read_varint()?;
                let flags = reader.read_u8()?;
                let hash = if flags & LEAF_FLAG_DUPLICATE != 0 {
                    None
                } else {
                    Some(reader.read_array()?)
                };
                leaves.push(PathLeaf {
                    offset,
                    hash,
                    txid: flags & LEAF_FLAG_TXID != 0,
                });
            }
            levels.push(leaves);
        }

        Ok(Self {
            block_height,
            levels,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        write_varint(out, self.block_height);
        out.push(self.levels.len() as u8);
        for level in &self.levels {
            write_varint(out, level.len() as u64);
            for leaf in level {
                write_varint(out, leaf.offset);
                let mut flags = 0;
                if leaf.hash.is_none() {
                    flags |= LEAF_FLAG_DUPLICATE;
                }
                if leaf.txid {
                    flags |= LEAF_FLAG_TXID;
                }
                out.push(flags);
                if let Some(hash) = &leaf.hash {
                    out.extend_from_slice(hash);
                }
            }
        }
    }
}

/// An entry in the bundle's transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeefTransaction {
    Full {
        txid: Txid,
        transaction: Transaction,
        bump_index: Option<usize>,
    },
    /// V2 only: a transaction known to the recipient, referenced by id.
    TxidOnly { txid: Txid },
}

impl BeefTransaction {
    pub fn full(transaction: Transaction, bump_index: Option<usize>) -> Self {
        Self::Full {
            txid: transaction.id(),
            transaction,
            bump_index,
        }
    }

    pub fn txid(&self) -> Txid {
        match self {
            Self::Full { txid, .. } | Self::TxidOnly { txid } => *txid,
        }
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Full { transaction, .. } => Some(transaction),
            Self::TxidOnly { .. } => None,
        }
    }
}

/// A parsed BEEF bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beef {
    pub version: u32,
    pub bumps: Vec<MerklePath>,
    pub transactions: Vec<BeefTransaction>,
    /// Subject declared by an Atomic BEEF prefix.
    pub atomic_txid: Option<Txid>,
}

impl Beef {
    /// A V1 bundle without merkle paths.
    pub fn new_v1(transactions: Vec<Transaction>) -> Self {
        Self {
            version: BEEF_V1,
            bumps: Vec::new(),
            transactions: transactions
                .into_iter()
                .map(|tx| BeefTransaction::full(tx, None))
                .collect(),
            atomic_txid: None,
        }
    }

    /// Mark this bundle as Atomic BEEF about `txid`.
    pub fn into_atomic(mut self, txid: Txid) -> Self {
        self.atomic_txid = Some(txid);
        self
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BundleError> {
        let mut reader = ByteReader::new(bytes);

        let mut version = reader.read_u32_le()?;
        let mut atomic_txid = None;
        if version == ATOMIC_BEEF {
            atomic_txid = Some(Txid::from_wire_hash(reader.read_array()?));
            version = reader.read_u32_le()?;
        }
        if version != BEEF_V1 && version != BEEF_V2 {
            return Err(BundleError::UnknownVersion(version));
        }

        let bump_count = reader.read_count("bump", 2)?;
        let mut bumps = Vec::with_capacity(bump_count);
        for _ in 0..bump_count {
            bumps.push(MerklePath::read(&mut reader)?);
        }

        let tx_count = reader.read_count("transaction", 1)?;
        let mut transactions = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            let entry = if version == BEEF_V2 {
                read_v2_entry(&mut reader, bumps.len())?
            } else {
                read_v1_entry(&mut reader, bumps.len())?
            };
            transactions.push(entry);
        }

        // Readers stop after the last transaction; padding is not an error.
        if !reader.is_empty() {
            debug!(
                trailing = reader.remaining(),
                "ignoring bytes after the last beef transaction"
            );
        }

        trace!(
            version,
            bumps = bumps.len(),
            transactions = transactions.len(),
            atomic = atomic_txid.is_some(),
            "parsed beef bundle"
        );

        Ok(Self {
            version,
            bumps,
            transactions,
            atomic_txid,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(txid) = &self.atomic_txid {
            out.extend_from_slice(&ATOMIC_BEEF.to_le_bytes());
            out.extend_from_slice(&txid.to_wire_hash());
        }
        out.extend_from_slice(&self.version.to_le_bytes());

        write_varint(&mut out, self.bumps.len() as u64);
        for bump in &self.bumps {
            bump.write(&mut out);
        }

        write_varint(&mut out, self.transactions.len() as u64);
        for entry in &self.transactions {
            match (self.version, entry) {
                (BEEF_V2, BeefTransaction::TxidOnly { txid }) => {
                    out.push(FORMAT_TXID_ONLY);
                    out.extend_from_slice(&txid.to_wire_hash());
                }
                (BEEF_V2, BeefTransaction::Full { transaction, bump_index, .. }) => {
                    match bump_index {
                        Some(index) => {
                            out.push(FORMAT_RAW_TX_AND_BUMP);
                            write_varint(&mut out, *index as u64);
                        }
                        None => out.push(FORMAT_RAW_TX),
                    }
                    out.extend_from_slice(&transaction.to_bytes());
                }
                // V1 cannot carry txid-only entries; they are dropped.
                (_, BeefTransaction::TxidOnly { .. }) => {}
                (_, BeefTransaction::Full { transaction, bump_index, .. }) => {
                    out.extend_from_slice(&transaction.to_bytes());
                    match bump_index {
                        Some(index) => {
                            out.push(1);
                            write_varint(&mut out, *index as u64);
                        }
                        None => out.push(0),
                    }
                }
            }
        }
        out
    }

    pub fn find(&self, txid: &Txid) -> Option<&BeefTransaction> {
        self.transactions.iter().find(|entry| entry.txid() == *txid)
    }

    /// Id of the transaction this bundle is about.
    pub fn subject_txid(&self) -> Result<Txid, BundleError> {
        if let Some(txid) = self.atomic_txid {
            return Ok(txid);
        }
        self.transactions
            .last()
            .map(BeefTransaction::txid)
            .ok_or(BundleError::EmptyBundle)
    }

    /// The transaction this bundle is about: the declared atomic subject,
    /// otherwise the last entry.
    pub fn subject_transaction(&self) -> Result<&Transaction, BundleError> {
        let entry = match self.atomic_txid {
            Some(txid) => self.find(&txid).ok_or(BundleError::SubjectNotFound(txid))?,
            None => self.transactions.last().ok_or(BundleError::EmptyBundle)?,
        };
        entry
            .transaction()
            .ok_or_else(|| BundleError::SubjectTxidOnly(entry.txid()))
    }
}

fn read_bump_index(reader: &mut ByteReader<'_>, bumps: usize) -> Result<usize, BundleError> {
    let index = reader.read_varint()?;
    if index >= bumps as u64 {
        return Err(BundleError::InvalidBumpIndex { index, bumps });
    }
    Ok(index as usize)
}

fn read_full_transaction(reader: &mut ByteReader<'_>) -> Result<(Txid, Transaction), BundleError> {
    let start = reader.position();
    let transaction = Transaction::read(reader)?;
    // Hash the exact bytes received, not a re-encoding.
    let txid = txid_of_raw(reader.consumed_since(start));
    Ok((txid, transaction))
}

fn read_v1_entry(reader: &mut ByteReader<'_>, bumps: usize) -> Result<BeefTransaction, BundleError> {
    let (txid, transaction) = read_full_transaction(reader)?;
    let bump_index = match reader.read_u8()? {
        0 => None,
        _ => Some(read_bump_index(reader, bumps)?),
    };
    Ok(BeefTransaction::Full {
        txid,
        transaction,
        bump_index,
    })
}

fn read_v2_entry(reader: &mut ByteReader<'_>, bumps: usize) -> Result<BeefTransaction, BundleError> {
    match reader.read_u8()? {
        FORMAT_TXID_ONLY => Ok(BeefTransaction::TxidOnly {
            txid: Txid::from_wire_hash(reader.read_array()?),
        }),
        format @ (FORMAT_RAW_TX | FORMAT_RAW_TX_AND_BUMP) => {
            let bump_index = if format == FORMAT_RAW_TX_AND_BUMP {
                Some(read_bump_index(reader, bumps)?)
            } else {
                None
            };
            let (txid, transaction) = read_full_transaction(reader)?;
            Ok(BeefTransaction::Full {
                txid,
                transaction,
                bump_index,
            })
        }
        other => Err(BundleError::InvalidTxFormat(other)),
    }
}
