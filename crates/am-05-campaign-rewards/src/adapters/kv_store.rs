//! # Key-Value Campaign Store
//!
//! ## Key Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `{funding}:{campaign_id}\0{created_ns:be64}{seq:be64}` | bincode `FundingRecord` |
//! | `{payouts}:{ad_id}\0{public_key}` | bincode `PayoutRecord` |
//! | `{campaigns}:{advertiser_id}\0{campaign_id}` | bincode `Campaign` |
//!
//! Funding keys sort by insertion within a campaign, so the first key under
//! a campaign prefix is its earliest record.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use shared_types::{KeyValueStore, Satoshis};
use tracing::debug;

use crate::config::CampaignConfig;
use crate::domain::entities::{Campaign, FundingRecord, PayoutRecord};
use crate::domain::errors::StorageError;
use crate::ports::outbound::CampaignStore;

pub struct KvCampaignStore<KV> {
    kv: KV,
    funding_prefix: Vec<u8>,
    payout_prefix: Vec<u8>,
    campaigns_prefix: Vec<u8>,
    sequence: AtomicU64,
    /// Serialises read-modify-write balance updates.
    balance_lock: Mutex<()>,
}

impl<KV: KeyValueStore> KvCampaignStore<KV> {
    pub fn new(kv: KV, config: &CampaignConfig) -> Self {
        Self {
            kv,
            funding_prefix: format!("{}:", config.funding_collection).into_bytes(),
            payout_prefix: format!("{}:", config.payout_collection).into_bytes(),
            campaigns_prefix: format!("{}:", config.campaign_collection).into_bytes(),
            sequence: AtomicU64::new(0),
            balance_lock: Mutex::new(()),
        }
    }

    fn campaign_prefix(&self, campaign_id: &str) -> Vec<u8> {
        let mut key = self.funding_prefix.clone();
        key.extend_from_slice(campaign_id.as_bytes());
        key.push(0);
        key
    }

    fn funding_key(&self, record: &FundingRecord) -> Vec<u8> {
        let created_ns = record.created_at.timestamp_nanos_opt().unwrap_or(i64::MAX).max(0) as u64;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut key = self.campaign_prefix(&record.campaign_id);
        key.extend_from_slice(&created_ns.to_be_bytes());
        key.extend_from_slice(&seq.to_be_bytes());
        key
    }

    fn payout_key(&self, ad_id: &str, public_key: &str) -> Vec<u8> {
        let mut key = self.payout_prefix.clone();
        key.extend_from_slice(ad_id.as_bytes());
        key.push(0);
        key.extend_from_slice(public_key.as_bytes());
        key
    }

    fn advertiser_prefix(&self, advertiser_id: &str) -> Vec<u8> {
        let mut key = self.campaigns_prefix.clone();
        key.extend_from_slice(advertiser_id.as_bytes());
        key.push(0);
        key
    }

    fn scan_fundings(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, FundingRecord)>, StorageError> {
        self.kv
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(key, value)| decode(&key, &value).map(|record| (key, record)))
            .collect()
    }

    fn earliest_funding(&self, campaign_id: &str) -> Result<Option<(Vec<u8>, FundingRecord)>, StorageError> {
        Ok(self.scan_fundings(&self.campaign_prefix(campaign_id))?.into_iter().next())
    }
}

fn encode<T: Serialize>(key: &[u8], value: &T) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value).map_err(|e| StorageError::Corrupt {
        key: hex::encode(key),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Corrupt {
        key: hex::encode(key),
        message: e.to_string(),
    })
}

#[async_trait]
impl<KV: KeyValueStore> CampaignStore for KvCampaignStore<KV> {
    async fn store_funding(&self, record: FundingRecord) -> Result<(), StorageError> {
        let key = self.funding_key(&record);
        let value = encode(&key, &record)?;
        self.kv.put(&key, &value)?;
        Ok(())
    }

    async fn campaign_funding(&self, campaign_id: &str) -> Result<Option<FundingRecord>, StorageError> {
        Ok(self.earliest_funding(campaign_id)?.map(|(_, record)| record))
    }

    async fn campaign_fundings(&self) -> Result<Vec<FundingRecord>, StorageError> {
        let mut records: Vec<_> = self
            .scan_fundings(&self.funding_prefix)?
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn funding_records_by_ids(&self, ids: &[String]) -> Result<Vec<FundingRecord>, StorageError> {
        let mut records = Vec::new();
        for id in ids {
            records.extend(
                self.scan_fundings(&self.campaign_prefix(id))?
                    .into_iter()
                    .map(|(_, record)| record),
            );
        }
        Ok(records)
    }

    async fn funded_ads(&self) -> Result<Vec<String>, StorageError> {
        let mut records: Vec<_> = self
            .scan_fundings(&self.funding_prefix)?
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut seen = std::collections::HashSet::new();
        Ok(records
            .into_iter()
            .filter(|r| seen.insert(r.campaign_id.clone()))
            .map(|r| r.campaign_id)
            .collect())
    }

    async fn update_campaign_balance(
        &self,
        campaign_id: &str,
        new_balance: Satoshis,
    ) -> Result<(), StorageError> {
        let _guard = self.balance_lock.lock();
        let Some((key, mut record)) = self.earliest_funding(campaign_id)? else {
            debug!("[am-05] Balance update for unknown campaign {}", campaign_id);
            return Ok(());
        };
        record.satoshis_balance = new_balance;
        let value = encode(&key, &record)?;
        self.kv.put(&key, &value)?;
        Ok(())
    }

    async fn store_payout(&self, payout: PayoutRecord) -> Result<(), StorageError> {
        let key = self.payout_key(&payout.ad_id, &payout.public_key);
        let value = encode(&key, &payout)?;
        self.kv.put(&key, &value)?;
        Ok(())
    }

    async fn has_submitted_answers(&self, ad_id: &str, public_key: &str) -> Result<bool, StorageError> {
        Ok(self.kv.exists(&self.payout_key(ad_id, public_key))?)
    }

    async fn create_campaign(&self, campaign: Campaign) -> Result<(), StorageError> {
        let mut key = self.advertiser_prefix(&campaign.advertiser_id);
        key.extend_from_slice(campaign.id.as_bytes());
        let value = encode(&key, &campaign)?;
        self.kv.put(&key, &value)?;
        Ok(())
    }

    async fn advertiser_campaigns(&self, advertiser_id: &str) -> Result<Vec<Campaign>, StorageError> {
        let mut campaigns = self
            .kv
            .prefix_scan(&self.advertiser_prefix(advertiser_id))?
            .into_iter()
            .map(|(key, value)| decode::<Campaign>(&key, &value))
            .collect::<Result<Vec<_>, _>>()?;
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(campaigns)
    }
}
