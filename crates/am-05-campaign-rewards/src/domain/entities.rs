//! # Campaign Records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Satoshis;

/// Funding attached to an advertisement campaign.
///
/// Only `satoshis_balance` changes after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRecord {
    pub campaign_id: String,
    pub questions: Vec<String>,
    /// Expected answers, aligned with `questions`.
    pub answers: Vec<String>,
    pub satoshis_balance: Satoshis,
    pub reward_per_answer: Satoshis,
    /// Funding transaction id; empty until a payment notification fills it.
    pub txid: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an advertiser campaign. New campaigns start as drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuestion {
    pub id: String,
    pub text: String,
    pub correct_answer: String,
}

/// An advertiser's campaign for one piece of media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub media_id: String,
    pub advertiser_id: String,
    pub reward_per_answer: Satoshis,
    pub total_funded: Satoshis,
    pub remaining_balance: Satoshis,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: CampaignStatus,
    pub questions: Vec<CampaignQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reward paid to one viewer for one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    pub ad_id: String,
    pub public_key: String,
    pub correct_answers: u32,
    pub reward: Satoshis,
    pub txid: String,
    pub created_at: DateTime<Utc>,
}
