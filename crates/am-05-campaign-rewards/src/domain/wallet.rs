//! # Wallet Messages
//!
//! JSON shapes of the two wallet calls the reward flow makes.

use serde::{Deserialize, Serialize};
use shared_types::Satoshis;

/// Security level of the reward key derivation protocol.
pub const REWARD_SECURITY_LEVEL: u8 = 2;
/// Protocol name of the reward key derivation.
pub const REWARD_PROTOCOL_ID: &str = "3241645161d8";
/// Wallet basket that campaign funding outputs are placed in.
pub const CAMPAIGN_FUNDING_BASKET: &str = "campaign_funding";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPublicKeyArgs {
    /// `[security_level, protocol_name]`.
    #[serde(rename = "protocolID")]
    pub protocol_id: (u8, String),
    #[serde(rename = "keyID")]
    pub key_id: String,
    pub counterparty: String,
}

impl GetPublicKeyArgs {
    /// Key shared with `counterparty` for one reward payment.
    pub fn reward_key(derivation_prefix: &str, derivation_suffix: &str, counterparty: &str) -> Self {
        Self {
            protocol_id: (REWARD_SECURITY_LEVEL, REWARD_PROTOCOL_ID.to_string()),
            key_id: format!("{derivation_prefix} {derivation_suffix}"),
            counterparty: counterparty.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutput {
    pub satoshis: Satoshis,
    /// Hex.
    pub locking_script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    pub output_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basket: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOptions {
    pub randomize_outputs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionArgs {
    pub description: String,
    pub outputs: Vec<ActionOutput>,
    pub options: ActionOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionResult {
    #[serde(default)]
    pub txid: Option<String>,
    /// Atomic BEEF of the signed transaction.
    #[serde(default)]
    pub tx: Option<Vec<u8>>,
}
