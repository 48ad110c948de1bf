//! # Overlay Bundle Store
//!
//! Keeps the BEEF of every transaction that had an output admitted, and the
//! set of admitted outputs per topic so later spends can be reported.
//!
//! ## Key Layout
//!
//! ```text
//! overlay:beef:{txid}                      -> BEEF bytes
//! overlay:out:{txid}{index:be32}{topic}    -> empty
//! ```

use am_04_lookup_service::{StorageError, TransactionBundleProvider};
use async_trait::async_trait;
use shared_types::{BatchOperation, KeyValueStore, OutputIndex, Txid};

const BEEF_PREFIX: &[u8] = b"overlay:beef:";
const OUTPUT_PREFIX: &[u8] = b"overlay:out:";

pub struct KvBeefStore<KV> {
    kv: KV,
}

impl<KV: KeyValueStore> KvBeefStore<KV> {
    pub fn new(kv: KV) -> Self {
        Self { kv }
    }

    fn beef_key(txid: &Txid) -> Vec<u8> {
        let mut key = Vec::with_capacity(BEEF_PREFIX.len() + 32);
        key.extend_from_slice(BEEF_PREFIX);
        key.extend_from_slice(txid.as_bytes());
        key
    }

    fn outpoint_prefix(txid: &Txid, output_index: OutputIndex) -> Vec<u8> {
        let mut key = Vec::with_capacity(OUTPUT_PREFIX.len() + 36);
        key.extend_from_slice(OUTPUT_PREFIX);
        key.extend_from_slice(txid.as_bytes());
        key.extend_from_slice(&output_index.to_be_bytes());
        key
    }

    fn output_key(txid: &Txid, output_index: OutputIndex, topic: &str) -> Vec<u8> {
        let mut key = Self::outpoint_prefix(txid, output_index);
        key.extend_from_slice(topic.as_bytes());
        key
    }

    /// Store `beef` and mark `outputs` admitted under `topic`, atomically.
    pub fn record_admission(
        &self,
        txid: &Txid,
        beef: &[u8],
        topic: &str,
        outputs: &[OutputIndex],
    ) -> Result<(), StorageError> {
        let mut ops = Vec::with_capacity(outputs.len() + 1);
        ops.push(BatchOperation::put(Self::beef_key(txid), beef.to_vec()));
        for index in outputs {
            ops.push(BatchOperation::put(Self::output_key(txid, *index, topic), Vec::new()));
        }
        self.kv.atomic_batch_write(ops)?;
        Ok(())
    }

    /// Topics under which the output is currently admitted.
    pub fn admitted_topics(&self, txid: &Txid, output_index: OutputIndex) -> Result<Vec<String>, StorageError> {
        let prefix = Self::outpoint_prefix(txid, output_index);
        let entries = self.kv.prefix_scan(&prefix)?;
        entries
            .into_iter()
            .map(|(key, _)| {
                String::from_utf8(key[prefix.len()..].to_vec()).map_err(|_| StorageError::Corrupt {
                    key: hex::encode(&key),
                    message: "topic is not UTF-8".to_string(),
                })
            })
            .collect()
    }

    /// Forget an admitted output; its bundle stays available.
    pub fn remove_admission(&self, txid: &Txid, output_index: OutputIndex, topic: &str) -> Result<(), StorageError> {
        self.kv.delete(&Self::output_key(txid, output_index, topic))?;
        Ok(())
    }
}

#[async_trait]
impl<KV: KeyValueStore> TransactionBundleProvider for KvBeefStore<KV> {
    async fn bundle_for(&self, txid: &Txid) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.kv.get(&Self::beef_key(txid))?)
    }
}
