//! # Overlay Host
//!
//! Drives the advertisement topic manager and lookup service the way an
//! overlay node does:
//!
//! ```text
//! submit(beef, topics)
//!   ├─ parse the bundle, find the subject transaction
//!   ├─ per hosted topic:
//!   │    ├─ inputs spending admitted outputs -> previous coins
//!   │    ├─ topic manager -> admittance instructions
//!   │    ├─ spent coins -> output_spent (+ output_deleted if not retained)
//!   │    └─ admitted outputs -> store BEEF, output_added
//!   └─ per-topic instructions (STEAK)
//! ```

use am_01_transaction_bundle::{Beef, BundleError, Transaction};
use am_03_topic_manager::AdvertisementTopicManager;
use am_04_lookup_service::{LookupError, StorageError};
use shared_types::{
    AdmittanceInstructions, LookupQuestion, LookupResponse, LookupService, OutputIndex,
    ServiceMetadata, TopicManager, Txid, ADVERTISEMENT_LOOKUP_SERVICE, ADVERTISEMENT_TOPIC,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::KvBeefStore;
use crate::container::subsystems::{NodeLookupService, SharedStore};

/// Admittance instructions per submitted topic.
pub type Steak = BTreeMap<String, AdmittanceInstructions>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Invalid transaction bundle: {0}")]
    InvalidBundle(#[from] BundleError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct OverlayHost {
    topic_manager: AdvertisementTopicManager,
    lookup: NodeLookupService,
    bundles: Arc<KvBeefStore<SharedStore>>,
}

impl OverlayHost {
    pub fn new(
        topic_manager: AdvertisementTopicManager,
        lookup: NodeLookupService,
        bundles: Arc<KvBeefStore<SharedStore>>,
    ) -> Self {
        Self {
            topic_manager,
            lookup,
            bundles,
        }
    }

    pub fn lookup_service(&self) -> &NodeLookupService {
        &self.lookup
    }

    /// Submit a transaction bundle to `topics`.
    ///
    /// Topics this node does not host are left out of the result.
    pub async fn submit(&self, beef: &[u8], topics: &[String]) -> Result<Steak, HostError> {
        let bundle = Beef::from_bytes(beef)?;
        let txid = bundle.subject_txid()?;
        let transaction = bundle.subject_transaction()?;
        debug!(txid = %txid, topics = ?topics, "[am-03] Submission received");

        let mut steak = Steak::new();
        for topic in topics {
            if steak.contains_key(topic) {
                continue;
            }
            if topic != ADVERTISEMENT_TOPIC {
                warn!("[am-03] Topic {} is not hosted here, skipping", topic);
                continue;
            }

            let previous_coins = self.previous_coins(transaction, topic)?;
            let instructions = self
                .topic_manager
                .identify_admissible_outputs(beef, &previous_coins)
                .await;

            self.retire_spent_coins(transaction, topic, &previous_coins, &instructions)
                .await?;
            self.admit_outputs(txid, beef, transaction, topic, &instructions)
                .await?;

            steak.insert(topic.clone(), instructions);
        }
        Ok(steak)
    }

    /// Input indices that spend outputs admitted under `topic`.
    fn previous_coins(&self, transaction: &Transaction, topic: &str) -> Result<Vec<OutputIndex>, HostError> {
        let mut coins = Vec::new();
        for (input_index, input) in transaction.inputs.iter().enumerate() {
            let topics = self
                .bundles
                .admitted_topics(&input.source_txid, input.source_output_index)?;
            if topics.iter().any(|t| t == topic) {
                coins.push(input_index as OutputIndex);
            }
        }
        Ok(coins)
    }

    async fn retire_spent_coins(
        &self,
        transaction: &Transaction,
        topic: &str,
        previous_coins: &[OutputIndex],
        instructions: &AdmittanceInstructions,
    ) -> Result<(), HostError> {
        for &input_index in previous_coins {
            let Some(input) = transaction.inputs.get(input_index as usize) else {
                continue;
            };
            let (spent_txid, spent_index) = (input.source_txid, input.source_output_index);
            self.lookup.output_spent(spent_txid, spent_index, topic).await;

            if !instructions.coins_to_retain.contains(&input_index) {
                self.bundles.remove_admission(&spent_txid, spent_index, topic)?;
                self.lookup.output_deleted(spent_txid, spent_index, topic).await;
                debug!("[am-03] Retired {}.{} from {}", spent_txid, spent_index, topic);
            }
        }
        Ok(())
    }

    async fn admit_outputs(
        &self,
        txid: Txid,
        beef: &[u8],
        transaction: &Transaction,
        topic: &str,
        instructions: &AdmittanceInstructions,
    ) -> Result<(), HostError> {
        if instructions.outputs_to_admit.is_empty() {
            return Ok(());
        }
        self.bundles
            .record_admission(&txid, beef, topic, &instructions.outputs_to_admit)?;

        for &index in &instructions.outputs_to_admit {
            match transaction.outputs.get(index as usize) {
                Some(output) => {
                    self.lookup
                        .output_added(txid, index, output.locking_script.as_bytes(), topic)
                        .await
                }
                None => warn!("[am-03] Admitted index {} is out of range for {}", index, txid),
            }
        }
        info!(
            txid = %txid,
            topic,
            "[am-03] Forwarded {} admitted output(s) to the lookup service",
            instructions.outputs_to_admit.len()
        );
        Ok(())
    }

    pub async fn lookup(&self, question: &LookupQuestion) -> Result<LookupResponse, LookupError> {
        self.lookup.lookup(question).await
    }

    pub async fn topic_managers(&self) -> BTreeMap<String, ServiceMetadata> {
        BTreeMap::from([(ADVERTISEMENT_TOPIC.to_string(), self.topic_manager.metadata().await)])
    }

    pub async fn lookup_services(&self) -> BTreeMap<String, ServiceMetadata> {
        BTreeMap::from([(ADVERTISEMENT_LOOKUP_SERVICE.to_string(), self.lookup.metadata().await)])
    }

    pub async fn topic_manager_documentation(&self, topic: &str) -> Option<String> {
        if topic == ADVERTISEMENT_TOPIC {
            Some(self.topic_manager.documentation().await)
        } else {
            None
        }
    }

    pub async fn lookup_service_documentation(&self, service: &str) -> Option<String> {
        if service == ADVERTISEMENT_LOOKUP_SERVICE {
            Some(self.lookup.documentation().await)
        } else {
            None
        }
    }
}
