//! # Key-Value Advertisement Store
//!
//! ## Key Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `ad:r:{txid}{index:be32}` | bincode `AdvertisementRecord` |
//! | `ad:s:{sponsor}\0{txid}{index:be32}` | empty (sponsor index) |
//! | `ad:f:{file_hash}\0{txid}{index:be32}` | empty (media index) |
//!
//! A record and its index entries are written in one atomic batch.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{BatchOperation, KeyValueStore, OutputIndex, TimeSource, Txid};
use tracing::debug;

use crate::domain::entities::AdvertisementRecord;
use crate::domain::errors::StorageError;
use crate::ports::outbound::{AdvertisementStorage, StoreOutcome};

/// Key namespaces of the advertisement collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    Record,
    BySponsor,
    ByFileHash,
}

impl KeyPrefix {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Record => b"ad:r:",
            KeyPrefix::BySponsor => b"ad:s:",
            KeyPrefix::ByFileHash => b"ad:f:",
        }
    }

    pub fn record_key(txid: &Txid, output_index: OutputIndex) -> Vec<u8> {
        let mut key = KeyPrefix::Record.as_bytes().to_vec();
        key.extend_from_slice(txid.as_bytes());
        key.extend_from_slice(&output_index.to_be_bytes());
        key
    }

    pub fn txid_prefix(txid: &Txid) -> Vec<u8> {
        let mut key = KeyPrefix::Record.as_bytes().to_vec();
        key.extend_from_slice(txid.as_bytes());
        key
    }

    /// Prefix of every index entry for `value` under this namespace.
    pub fn index_prefix(&self, value: &str) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(value.as_bytes());
        key.push(0);
        key
    }

    pub fn index_key(&self, value: &str, txid: &Txid, output_index: OutputIndex) -> Vec<u8> {
        let mut key = self.index_prefix(value);
        key.extend_from_slice(txid.as_bytes());
        key.extend_from_slice(&output_index.to_be_bytes());
        key
    }
}

/// [`AdvertisementStorage`] over any [`KeyValueStore`].
pub struct KvAdvertisementStorage<KV, TS> {
    kv: KV,
    time_source: TS,
    /// Serialises check-then-insert in `store_record`.
    write_lock: Mutex<()>,
}

impl<KV: KeyValueStore, TS: TimeSource> KvAdvertisementStorage<KV, TS> {
    pub fn new(kv: KV, time_source: TS) -> Self {
        Self {
            kv,
            time_source,
            write_lock: Mutex::new(()),
        }
    }

    fn decode(key: &[u8], bytes: &[u8]) -> Result<AdvertisementRecord, StorageError> {
        bincode::deserialize(bytes).map_err(|e| StorageError::Corrupt {
            key: hex_key(key),
            message: e.to_string(),
        })
    }

    fn scan_records(&self, prefix: &[u8]) -> Result<Vec<AdvertisementRecord>, StorageError> {
        self.kv
            .prefix_scan(prefix)?
            .iter()
            .map(|(key, value)| Self::decode(key, value))
            .collect()
    }

    /// Resolve index entries under `prefix` to their records.
    fn scan_index(&self, prefix: &[u8]) -> Result<Vec<AdvertisementRecord>, StorageError> {
        let mut records = Vec::new();
        for (key, _) in self.kv.prefix_scan(prefix)? {
            let suffix = &key[prefix.len()..];
            let record_key = [KeyPrefix::Record.as_bytes(), suffix].concat();
            match self.kv.get(&record_key)? {
                Some(bytes) => records.push(Self::decode(&record_key, &bytes)?),
                None => debug!("[am-04] Dangling index entry {}", hex_key(&key)),
            }
        }
        Ok(records)
    }

    fn active(&self, records: Vec<AdvertisementRecord>) -> Vec<AdvertisementRecord> {
        let now = self.time_source.now();
        sorted(records.into_iter().filter(|r| r.is_active_at(now)).collect())
    }
}

#[async_trait]
impl<KV, TS> AdvertisementStorage for KvAdvertisementStorage<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    async fn store_record(&self, record: AdvertisementRecord) -> Result<StoreOutcome, StorageError> {
        let key = KeyPrefix::record_key(&record.txid, record.output_index);
        let value = bincode::serialize(&record).map_err(|e| StorageError::Corrupt {
            key: hex_key(&key),
            message: e.to_string(),
        })?;

        let _guard = self.write_lock.lock();
        if self.kv.exists(&key)? {
            return Ok(StoreOutcome::AlreadyIndexed);
        }

        let operations = vec![
            BatchOperation::put(
                KeyPrefix::BySponsor.index_key(&record.sponsor, &record.txid, record.output_index),
                Vec::new(),
            ),
            BatchOperation::put(
                KeyPrefix::ByFileHash.index_key(&record.file_hash, &record.txid, record.output_index),
                Vec::new(),
            ),
            BatchOperation::put(key, value),
        ];
        self.kv.atomic_batch_write(operations)?;
        Ok(StoreOutcome::Inserted)
    }

    async fn find_all(&self) -> Result<Vec<AdvertisementRecord>, StorageError> {
        let records = self.scan_records(KeyPrefix::Record.as_bytes())?;
        Ok(self.active(records))
    }

    async fn find_by_ids(&self, txids: &[Txid]) -> Result<Vec<AdvertisementRecord>, StorageError> {
        let mut records = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for txid in txids {
            if seen.insert(*txid) {
                records.extend(self.scan_records(&KeyPrefix::txid_prefix(txid))?);
            }
        }
        Ok(self.active(records))
    }

    async fn find_by_sponsor(&self, sponsor: &str) -> Result<Vec<AdvertisementRecord>, StorageError> {
        let records = self.scan_index(&KeyPrefix::BySponsor.index_prefix(sponsor))?;
        Ok(self.active(records))
    }

    async fn find_by_txid(&self, txid: &Txid) -> Result<Option<AdvertisementRecord>, StorageError> {
        let records = self.scan_records(&KeyPrefix::txid_prefix(txid))?;
        Ok(self.active(records).into_iter().next())
    }

    async fn find_by_file_hash(
        &self,
        file_hash: &str,
    ) -> Result<Option<AdvertisementRecord>, StorageError> {
        let records = self.scan_index(&KeyPrefix::ByFileHash.index_prefix(file_hash))?;
        Ok(self.active(records).into_iter().next())
    }

    async fn expired_ads(&self) -> Result<Vec<AdvertisementRecord>, StorageError> {
        let now = self.time_source.now();
        let records = self.scan_records(KeyPrefix::Record.as_bytes())?;
        Ok(sorted(records.into_iter().filter(|r| !r.is_active_at(now)).collect()))
    }
}

/// Insertion order, ties broken by outpoint.
fn sorted(mut records: Vec<AdvertisementRecord>) -> Vec<AdvertisementRecord> {
    records.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.txid.as_bytes().cmp(b.txid.as_bytes()))
            .then_with(|| a.output_index.cmp(&b.output_index))
    });
    records
}

fn hex_key(key: &[u8]) -> String {
    hex::encode(key)
}
