//! # Campaign Rewards (am-05)
//!
//! Funding records for advertisement campaigns and the quiz reward flow:
//! a viewer submits answers, correct answers are paid from the campaign
//! balance through the server wallet.
//!
//! ## Reward Flow
//!
//! ```text
//! submit_answers
//!   ├─ reject duplicate (ad, viewer) submission
//!   ├─ score answers case-insensitively against the funding record
//!   ├─ reward = correct × reward_per_answer, must not exceed the balance
//!   ├─ wallet: derive a key shared with the viewer, pay it via P2PKH
//!   ├─ write the decremented balance
//!   └─ record the payout
//! ```
//!
//! The balance write and the payout insert are independent writes.
//!
//! Advertisers can also create draft campaigns; each draft comes with a
//! funding payment request addressed to the server identity key.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::kv_store::KvCampaignStore;
pub use config::CampaignConfig;
pub use domain::{
    entities::{Campaign, CampaignQuestion, CampaignStatus, FundingRecord, PayoutRecord},
    errors::{CampaignError, StorageError, WalletError},
    keys::{
        hash160, identity_key_from_private_hex, p2pkh_locking_script, random_campaign_id,
        random_derivation_id,
    },
    requests::{
        CreateCampaignRequest, CreateCampaignResponse, FundCampaignRequest, FundCampaignResponse,
        RewardPayment, SubmitAnswersRequest,
    },
    scoring::count_correct_answers,
    wallet::{
        ActionOptions, ActionOutput, CreateActionArgs, CreateActionResult, GetPublicKeyArgs,
        CAMPAIGN_FUNDING_BASKET, REWARD_PROTOCOL_ID, REWARD_SECURITY_LEVEL,
    },
};
pub use ports::outbound::{CampaignStore, WalletClient};
pub use service::CampaignService;
