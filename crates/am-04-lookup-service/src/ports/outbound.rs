//! # Outbound Ports (Driven Ports)

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::Txid;

use crate::domain::entities::AdvertisementRecord;
use crate::domain::errors::StorageError;

/// Result of offering a record to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Inserted,
    /// A record with the same `(txid, output_index)` already exists and was
    /// left untouched.
    AlreadyIndexed,
}

/// Persistence for advertisement records.
///
/// Every `find_*` method returns only records whose end date is after the
/// current time; `expired_ads` returns the complement.
#[async_trait]
pub trait AdvertisementStorage: Send + Sync {
    /// Insert unless `(txid, output_index)` is already present.
    async fn store_record(&self, record: AdvertisementRecord) -> Result<StoreOutcome, StorageError>;

    async fn find_all(&self) -> Result<Vec<AdvertisementRecord>, StorageError>;

    async fn find_by_ids(&self, txids: &[Txid]) -> Result<Vec<AdvertisementRecord>, StorageError>;

    async fn find_by_sponsor(&self, sponsor: &str) -> Result<Vec<AdvertisementRecord>, StorageError>;

    /// First active record of `txid`, if any.
    async fn find_by_txid(&self, txid: &Txid) -> Result<Option<AdvertisementRecord>, StorageError>;

    async fn find_by_file_hash(
        &self,
        file_hash: &str,
    ) -> Result<Option<AdvertisementRecord>, StorageError>;

    async fn expired_ads(&self) -> Result<Vec<AdvertisementRecord>, StorageError>;
}

/// Source of the transaction bundles attached to output-list answers.
#[async_trait]
pub trait TransactionBundleProvider: Send + Sync {
    /// BEEF for `txid`, or `None` when the host never stored one.
    async fn bundle_for(&self, txid: &Txid) -> Result<Option<Vec<u8>>, StorageError>;
}

#[async_trait]
impl<T: TransactionBundleProvider + ?Sized> TransactionBundleProvider for Arc<T> {
    async fn bundle_for(&self, txid: &Txid) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).bundle_for(txid).await
    }
}
