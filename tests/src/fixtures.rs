//! Shared builders for the integration flows and benchmarks.

use std::sync::Arc;

use ad_node::container::{SharedClock, SharedStore, SharedWallet};
use ad_node::{AdNode, NodeConfig};
use am_01_transaction_bundle::{Beef, LockingScript, Transaction, TransactionInput, TransactionOutput};
use am_02_pushdrop::{AdvertisementToken, PushDrop, PROTOCOL_MARKER};
use am_05_campaign_rewards::{
    CreateActionArgs, CreateActionResult, GetPublicKeyArgs, WalletClient, WalletError,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use k256::SecretKey;
use parking_lot::Mutex;
use shared_types::{FixedTimeSource, InMemoryKVStore, Txid};

/// Server private key used by every test node (scalar 1).
pub const SERVER_PRIVATE_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
/// Compressed public key of [`SERVER_PRIVATE_KEY`].
pub const SERVER_IDENTITY_KEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// Fixed "now" of every test clock.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
}

pub fn advertisement(sponsor: &str, days_left: i64) -> AdvertisementToken {
    AdvertisementToken {
        title: "Mountain Coffee".into(),
        description: "Watch and answer three questions".into(),
        file_hash: "uhrp://coffee-ad".into(),
        end_date: epoch() + Duration::days(days_left),
        sponsor: sponsor.into(),
        reward_per_answer: 100,
        service_url: "https://ads.example".into(),
    }
}

/// PushDrop script carrying `fields`, locked to a fresh key.
pub fn pushdrop_script(fields: &[Vec<u8>]) -> LockingScript {
    let key = SecretKey::random(&mut rand::thread_rng()).public_key();
    PushDrop::lock(&key, fields)
}

pub fn advertisement_script(token: &AdvertisementToken) -> LockingScript {
    pushdrop_script(&token.to_fields())
}

/// Advertisement fields whose marker is not the protocol marker.
pub fn foreign_marker_script(token: &AdvertisementToken) -> LockingScript {
    let mut fields = token.to_fields();
    fields[0] = b"1SomeOtherProtocol".to_vec();
    assert_ne!(fields[0], PROTOCOL_MARKER.as_bytes());
    pushdrop_script(&fields)
}

pub fn p2pkh_like_script() -> LockingScript {
    LockingScript::from_hex("76a914000000000000000000000000000000000000000088ac").unwrap()
}

/// A transaction spending `(spends, 0)` with one 1-sat output per script.
pub fn transaction(spends: Txid, scripts: Vec<LockingScript>) -> Transaction {
    Transaction {
        version: 1,
        inputs: vec![TransactionInput {
            source_txid: spends,
            source_output_index: 0,
            unlocking_script: vec![0x51],
            sequence: 0xffff_ffff,
        }],
        outputs: scripts
            .into_iter()
            .map(|locking_script| TransactionOutput {
                satoshis: 1,
                locking_script,
            })
            .collect(),
        lock_time: 0,
    }
}

pub fn beef(tx: &Transaction) -> Vec<u8> {
    Beef::new_v1(vec![tx.clone()]).to_bytes()
}

pub fn atomic_beef(tx: &Transaction) -> Vec<u8> {
    Beef::new_v1(vec![tx.clone()]).into_atomic(tx.id()).to_bytes()
}

/// Wallet that answers every call locally and remembers what it was asked.
#[derive(Default)]
pub struct RecordingWallet {
    pub key_requests: Mutex<Vec<GetPublicKeyArgs>>,
    pub actions: Mutex<Vec<CreateActionArgs>>,
}

impl RecordingWallet {
    /// Key returned for every derivation (scalar 2).
    pub const DERIVED_KEY: &'static str =
        "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";

    pub fn payment(args: &CreateActionArgs) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TransactionInput {
                source_txid: Txid([0x77; 32]),
                source_output_index: 1,
                unlocking_script: vec![],
                sequence: 0xffff_ffff,
            }],
            outputs: args
                .outputs
                .iter()
                .map(|o| TransactionOutput {
                    satoshis: o.satoshis,
                    locking_script: LockingScript::from_hex(&o.locking_script).unwrap(),
                })
                .collect(),
            lock_time: 0,
        }
    }
}

#[async_trait]
impl WalletClient for RecordingWallet {
    async fn get_public_key(&self, args: GetPublicKeyArgs) -> Result<String, WalletError> {
        self.key_requests.lock().push(args);
        Ok(Self::DERIVED_KEY.to_string())
    }

    async fn create_action(&self, args: CreateActionArgs) -> Result<CreateActionResult, WalletError> {
        let tx = Self::payment(&args);
        self.actions.lock().push(args);
        Ok(CreateActionResult {
            txid: Some(tx.id().to_hex()),
            tx: Some(atomic_beef(&tx)),
        })
    }
}

/// A node over in-memory storage with a controllable clock.
pub struct TestNode {
    pub node: AdNode,
    pub wallet: Arc<RecordingWallet>,
    pub clock: Arc<FixedTimeSource>,
}

impl TestNode {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: NodeConfig) -> Self {
        let wallet = Arc::new(RecordingWallet::default());
        let clock = Arc::new(FixedTimeSource::new(epoch()));
        let store: SharedStore = Arc::new(InMemoryKVStore::new());
        let shared_wallet: SharedWallet = wallet.clone();
        let shared_clock: SharedClock = clock.clone();
        let node = AdNode::build(config, store, shared_wallet, shared_clock).unwrap();
        Self { node, wallet, clock }
    }
}

impl Default for TestNode {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.wallet.server_private_key = SERVER_PRIVATE_KEY.to_string();
    config
}
