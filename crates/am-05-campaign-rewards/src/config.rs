//! Campaign storage configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Key namespace of funding records.
    pub funding_collection: String,
    /// Key namespace of payout records.
    pub payout_collection: String,
    /// Key namespace of advertiser campaigns.
    pub campaign_collection: String,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            funding_collection: "funding".to_string(),
            payout_collection: "payouts".to_string(),
            campaign_collection: "campaigns".to_string(),
        }
    }
}
