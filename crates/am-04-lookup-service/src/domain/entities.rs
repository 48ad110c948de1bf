//! # Advertisement Records

use am_02_pushdrop::AdvertisementToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{OutputIndex, Satoshis, Txid, UtxoReference};

/// An indexed advertisement. Identity is `(txid, output_index)`.
///
/// Written once, on the first notification for its output; never updated
/// or removed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementRecord {
    pub txid: Txid,
    pub output_index: OutputIndex,
    pub title: String,
    pub description: String,
    pub file_hash: String,
    pub end_date: DateTime<Utc>,
    pub sponsor: String,
    pub reward_per_answer: Satoshis,
    pub service_url: String,
    pub created_at: DateTime<Utc>,
}

impl AdvertisementRecord {
    pub fn from_token(
        txid: Txid,
        output_index: OutputIndex,
        token: AdvertisementToken,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            txid,
            output_index,
            title: token.title,
            description: token.description,
            file_hash: token.file_hash,
            end_date: token.end_date,
            sponsor: token.sponsor,
            reward_per_answer: token.reward_per_answer,
            service_url: token.service_url,
            created_at,
        }
    }

    /// Still running at `now`: the end date is strictly in the future.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.end_date > now
    }

    pub fn outpoint(&self) -> UtxoReference {
        UtxoReference::new(self.txid, self.output_index)
    }
}
