//! Lookup service configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Report every advertisement at output index 0 instead of its true
    /// index. Records are still keyed by the true outpoint, so sibling ads
    /// in one transaction are all kept. Enable only for clients that still
    /// expect the older answers.
    pub legacy_zero_output_index: bool,
}
