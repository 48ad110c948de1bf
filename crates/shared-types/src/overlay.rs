//! # Overlay Contracts
//!
//! Wire shapes and capability traits exchanged between the hosting overlay
//! node and the advertisement topic manager / lookup service.
//!
//! ## Capability Traits
//!
//! The hosting node drives two kinds of plug-ins:
//!
//! - [`TopicManager`]: classifies the outputs of a submitted transaction.
//! - [`LookupService`]: observes output lifecycle and answers queries.
//!
//! Lifecycle hooks a service does not care about keep their default no-op
//! bodies, so the host can call every hook unconditionally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{OutputIndex, Txid, UtxoReference};

/// Topic name under which advertisement tokens are admitted.
pub const ADVERTISEMENT_TOPIC: &str = "tm_advertisement";

/// Lookup service name that answers advertisement queries.
pub const ADVERTISEMENT_LOOKUP_SERVICE: &str = "ls_advertisement";

/// Result of running a topic manager over one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmittanceInstructions {
    /// Indices of outputs that belong to the topic, in ascending order.
    pub outputs_to_admit: Vec<OutputIndex>,
    /// Previously admitted coins the topic wants to keep tracking.
    pub coins_to_retain: Vec<OutputIndex>,
}

impl AdmittanceInstructions {
    /// Instructions that admit nothing and retain nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs_to_admit.is_empty() && self.coins_to_retain.is_empty()
    }
}

/// A query routed to a lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupQuestion {
    /// Name of the lookup service that should answer.
    pub service: String,
    /// Service-specific query payload. `null` and absent are the same.
    #[serde(default)]
    pub query: Option<serde_json::Value>,
}

impl LookupQuestion {
    pub fn new(service: impl Into<String>, query: serde_json::Value) -> Self {
        Self {
            service: service.into(),
            query: Some(query),
        }
    }
}

/// One output in an output-list answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputListEntry {
    pub txid: Txid,
    pub output_index: OutputIndex,
    /// Transaction bundle (BEEF) proving the output's transaction.
    pub beef: Vec<u8>,
}

/// A fully resolved lookup answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LookupAnswer {
    #[serde(rename = "output-list")]
    OutputList { outputs: Vec<OutputListEntry> },
}

/// What a lookup service hands back.
///
/// An `Answer` carries the transaction bundles inline; a `Formula` lists
/// output references the host resolves on its own. Callers rely on the shape
/// differing by query kind, so the two are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Answer(LookupAnswer),
    Formula(Vec<UtxoReference>),
}

impl LookupResponse {
    /// Number of outputs referenced, regardless of shape.
    pub fn len(&self) -> usize {
        match self {
            Self::Answer(LookupAnswer::OutputList { outputs }) => outputs.len(),
            Self::Formula(refs) => refs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Descriptive metadata published by topic managers and lookup services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub name: String,
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iconURL")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "informationURL")]
    pub information_url: Option<String>,
}

impl ServiceMetadata {
    pub fn new(name: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_description: short_description.into(),
            icon_url: None,
            version: None,
            information_url: None,
        }
    }
}

/// Classifies the outputs of submitted transactions for one topic.
#[async_trait]
pub trait TopicManager: Send + Sync {
    /// Decide which outputs of `beef`'s subject transaction to admit.
    ///
    /// Never fails: unparseable input yields empty instructions.
    async fn identify_admissible_outputs(
        &self,
        beef: &[u8],
        previous_coins: &[OutputIndex],
    ) -> AdmittanceInstructions;

    /// Markdown documentation for submitters.
    async fn documentation(&self) -> String;

    async fn metadata(&self) -> ServiceMetadata;
}

/// Tracks admitted outputs and answers queries about them.
#[async_trait]
pub trait LookupService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// An admitted output appeared under `topic`.
    ///
    /// Failures are handled inside the service; one bad output must never
    /// stop the host from notifying about the next.
    async fn output_added(
        &self,
        txid: Txid,
        output_index: OutputIndex,
        output_script: &[u8],
        topic: &str,
    );

    /// An admitted output was spent.
    async fn output_spent(&self, _txid: Txid, _output_index: OutputIndex, _topic: &str) {}

    /// An admitted output was removed from the overlay.
    async fn output_deleted(&self, _txid: Txid, _output_index: OutputIndex, _topic: &str) {}

    async fn lookup(&self, question: &LookupQuestion) -> Result<LookupResponse, Self::Error>;

    async fn documentation(&self) -> String;

    async fn metadata(&self) -> ServiceMetadata;
}
