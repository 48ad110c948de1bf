//! # Node Configuration
//!
//! Unified configuration for the overlay host, the HTTP surface and the
//! campaign backend.
//!
//! ## Security Requirements
//!
//! - `wallet.server_private_key` MUST be set; it funds every quiz reward
//! - collection names share one key space with the overlay index and must
//!   not collide with it

use am_04_lookup_service::LookupConfig;
use am_05_campaign_rewards::{identity_key_from_private_hex, CampaignConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Key namespaces already used by the overlay host and the lookup index.
const RESERVED_NAMESPACES: &[&str] = &["ad", "overlay"];

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub wallet: WalletConfig,
    pub lookup: LookupConfig,
    pub campaign: CampaignConfig,
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable source.
    ///
    /// Recognised: `PORT`, `DATA_DIR`, `WALLET_URL`, `SERVER_PRIVATE_KEY`,
    /// `FUNDING_COLLECTION_NAME`, `PAYOUT_COLLECTION_NAME`,
    /// `CAMPAIGN_COLLECTION_NAME`, `LEGACY_ZERO_OUTPUT_INDEX`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = var("PORT") {
            self.http.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: port,
            })?;
        }
        if let Some(dir) = var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("WALLET_URL") {
            self.wallet.url = url;
        }
        if let Some(key) = var("SERVER_PRIVATE_KEY") {
            self.wallet.server_private_key = key;
        }
        if let Some(name) = var("FUNDING_COLLECTION_NAME") {
            self.campaign.funding_collection = name;
        }
        if let Some(name) = var("PAYOUT_COLLECTION_NAME") {
            self.campaign.payout_collection = name;
        }
        if let Some(name) = var("CAMPAIGN_COLLECTION_NAME") {
            self.campaign.campaign_collection = name;
        }
        if let Some(flag) = var("LEGACY_ZERO_OUTPUT_INDEX") {
            self.lookup.legacy_zero_output_index = match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "LEGACY_ZERO_OUTPUT_INDEX",
                        value: flag,
                    })
                }
            };
        }
        Ok(())
    }

    /// Validate configuration before any subsystem is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wallet.server_private_key.is_empty() {
            return Err(ConfigError::MissingServerKey);
        }
        identity_key_from_private_hex(&self.wallet.server_private_key)
            .map_err(|_| ConfigError::InvalidServerKey)?;

        if self.wallet.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "WALLET_URL",
                value: String::new(),
            });
        }

        let names = [
            &self.campaign.funding_collection,
            &self.campaign.payout_collection,
            &self.campaign.campaign_collection,
        ];
        for (i, name) in names.iter().enumerate() {
            validate_collection_name(name)?;
            if names[..i].contains(name) {
                return Err(ConfigError::CollectionClash((*name).clone()));
            }
        }
        Ok(())
    }
}

fn validate_collection_name(name: &str) -> Result<(), ConfigError> {
    let well_formed = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !well_formed {
        return Err(ConfigError::InvalidCollectionName(name.to_string()));
    }
    if RESERVED_NAMESPACES.contains(&name) {
        return Err(ConfigError::CollectionClash(name.to_string()));
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SERVER_PRIVATE_KEY is not set")]
    MissingServerKey,

    #[error("SERVER_PRIVATE_KEY must be 32 bytes of hex")]
    InvalidServerKey,

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid collection name {0:?}")]
    InvalidCollectionName(String),

    #[error("Collection name {0:?} clashes with another namespace")]
    CollectionClash(String),
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, bytes.
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

impl HttpConfig {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name: "HTTP address", value })
    }
}

/// Which key-value backend holds the node's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    RocksDb,
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the RocksDB database.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: if cfg!(feature = "rocksdb") {
                StorageBackend::RocksDb
            } else {
                StorageBackend::Memory
            },
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Server wallet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Base URL of the JSON wallet.
    pub url: String,
    /// Origin reported to the wallet with every call.
    pub originator: String,
    /// Hex private key whose public key is the reward sender identity.
    pub server_private_key: String,
    pub timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3321".to_string(),
            originator: "ad-marketplace".to_string(),
            server_private_key: String::new(),
            timeout_secs: 30,
        }
    }
}
