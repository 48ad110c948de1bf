//! # Subsystem Container
//!
//! Builds every subsystem over one shared key-value store, in dependency
//! order:
//!
//! 1. bundle store (am-01 bundles kept by the host)
//! 2. lookup index and service (am-04)
//! 3. topic manager (am-03) and overlay host
//! 4. campaign store and reward service (am-05)

use am_03_topic_manager::AdvertisementTopicManager;
use am_04_lookup_service::{AdvertisementLookupService, KvAdvertisementStorage};
use am_05_campaign_rewards::{identity_key_from_private_hex, CampaignService, KvCampaignStore, WalletClient};
use shared_types::{InMemoryKVStore, KVStoreError, KeyValueStore, TimeSource};
use std::sync::Arc;
use tracing::info;

use crate::adapters::KvBeefStore;
use crate::container::config::{ConfigError, NodeConfig, StorageBackend, StorageConfig};
use crate::host::OverlayHost;

pub type SharedStore = Arc<dyn KeyValueStore>;
pub type SharedClock = Arc<dyn TimeSource>;
pub type SharedWallet = Arc<dyn WalletClient>;

pub type NodeLookupService = AdvertisementLookupService<
    KvAdvertisementStorage<SharedStore, SharedClock>,
    Arc<KvBeefStore<SharedStore>>,
    SharedClock,
>;

pub type NodeCampaignService = CampaignService<KvCampaignStore<SharedStore>, SharedWallet, SharedClock>;

/// All initialized subsystems of a node.
pub struct AdNode {
    pub config: NodeConfig,
    pub host: Arc<OverlayHost>,
    pub campaigns: Arc<NodeCampaignService>,
}

impl AdNode {
    /// Wire the subsystems. `config` must already be validated.
    pub fn build(
        config: NodeConfig,
        store: SharedStore,
        wallet: SharedWallet,
        clock: SharedClock,
    ) -> Result<Self, ConfigError> {
        let sender_identity_key = identity_key_from_private_hex(&config.wallet.server_private_key)
            .map_err(|_| ConfigError::InvalidServerKey)?;

        let bundles = Arc::new(KvBeefStore::new(Arc::clone(&store)));
        let lookup = AdvertisementLookupService::new(
            KvAdvertisementStorage::new(Arc::clone(&store), Arc::clone(&clock)),
            Arc::clone(&bundles),
            Arc::clone(&clock),
            config.lookup.clone(),
        );
        let host = OverlayHost::new(AdvertisementTopicManager::new(), lookup, bundles);
        info!("[am-04] Lookup service ready");

        let campaigns = CampaignService::new(
            KvCampaignStore::new(Arc::clone(&store), &config.campaign),
            wallet,
            clock,
            sender_identity_key,
        );
        info!(
            sender = campaigns.sender_identity_key(),
            "[am-05] Campaign service ready"
        );

        Ok(Self {
            config,
            host: Arc::new(host),
            campaigns: Arc::new(campaigns),
        })
    }
}

/// Open the configured key-value backend.
pub fn open_store(config: &StorageConfig) -> Result<SharedStore, KVStoreError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            Ok(Arc::new(InMemoryKVStore::new()))
        }
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => {
            use crate::adapters::storage::{RocksDbConfig, RocksDbStore};
            let store = RocksDbStore::open(RocksDbConfig::in_data_dir(&config.data_dir))?;
            info!(path = ?store.path(), "Opened RocksDB storage");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => Err(KVStoreError::Unavailable {
            message: "built without the rocksdb feature".to_string(),
        }),
    }
}
