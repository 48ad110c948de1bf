//! # Container
//!
//! Configuration and dependency wiring for the node.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, HttpConfig, NodeConfig, StorageBackend, StorageConfig, WalletConfig};
pub use subsystems::{open_store, AdNode, NodeCampaignService, NodeLookupService, SharedClock, SharedStore, SharedWallet};
