//! # Outbound Ports (Driven Ports)

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::Satoshis;

use crate::domain::entities::{Campaign, FundingRecord, PayoutRecord};
use crate::domain::errors::{StorageError, WalletError};
use crate::domain::wallet::{CreateActionArgs, CreateActionResult, GetPublicKeyArgs};

/// Persistence for campaigns, funding and payout records.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn store_funding(&self, record: FundingRecord) -> Result<(), StorageError>;

    /// The earliest funding record of `campaign_id`.
    async fn campaign_funding(&self, campaign_id: &str) -> Result<Option<FundingRecord>, StorageError>;

    /// Every funding record, newest first.
    async fn campaign_fundings(&self) -> Result<Vec<FundingRecord>, StorageError>;

    async fn funding_records_by_ids(&self, ids: &[String]) -> Result<Vec<FundingRecord>, StorageError>;

    /// Distinct campaign ids that have funding, in first-funded order.
    async fn funded_ads(&self) -> Result<Vec<String>, StorageError>;

    /// Overwrite the balance of the earliest funding record of `campaign_id`.
    /// Unknown campaigns are ignored.
    async fn update_campaign_balance(
        &self,
        campaign_id: &str,
        new_balance: Satoshis,
    ) -> Result<(), StorageError>;

    async fn store_payout(&self, payout: PayoutRecord) -> Result<(), StorageError>;

    async fn has_submitted_answers(&self, ad_id: &str, public_key: &str) -> Result<bool, StorageError>;

    async fn create_campaign(&self, campaign: Campaign) -> Result<(), StorageError>;

    /// Campaigns of one advertiser, newest first.
    async fn advertiser_campaigns(&self, advertiser_id: &str) -> Result<Vec<Campaign>, StorageError>;
}

/// The server's wallet.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Hex public key derived for `args`.
    async fn get_public_key(&self, args: GetPublicKeyArgs) -> Result<String, WalletError>;

    async fn create_action(&self, args: CreateActionArgs) -> Result<CreateActionResult, WalletError>;
}

#[async_trait]
impl<T: WalletClient + ?Sized> WalletClient for Arc<T> {
    async fn get_public_key(&self, args: GetPublicKeyArgs) -> Result<String, WalletError> {
        (**self).get_public_key(args).await
    }

    async fn create_action(&self, args: CreateActionArgs) -> Result<CreateActionResult, WalletError> {
        (**self).create_action(args).await
    }
}
