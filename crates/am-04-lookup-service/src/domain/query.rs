//! # Query Parsing
//!
//! The query payload is loosely typed JSON. It is read into a [`LookupQuery`]
//! once, so dispatch never inspects raw JSON.

use serde::Deserialize;
use serde_json::Value;
use shared_types::Txid;

use crate::domain::errors::LookupError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuery {
    #[serde(default)]
    find_all: Option<bool>,
    #[serde(default)]
    ids: Option<Vec<String>>,
    #[serde(default)]
    public_key: Option<String>,
}

/// A parsed `ls_advertisement` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    FindAll,
    /// Txids to match. Entries that are not valid txids can never match and
    /// are dropped while parsing.
    ByIds(Vec<Txid>),
    BySponsor(String),
}

impl LookupQuery {
    /// Parse by precedence: `findAll`, then `ids`, then `publicKey`.
    pub fn parse(value: &Value) -> Result<Self, LookupError> {
        let raw = RawQuery::deserialize(value)
            .map_err(|e| LookupError::InvalidQuery(format!("malformed query: {e}")))?;

        if raw.find_all == Some(true) {
            return Ok(Self::FindAll);
        }

        if let Some(ids) = raw.ids {
            let txids = ids.iter().filter_map(|id| id.parse::<Txid>().ok()).collect();
            return Ok(Self::ByIds(txids));
        }

        match raw.public_key {
            Some(key) if !key.is_empty() => Ok(Self::BySponsor(key)),
            _ => Err(LookupError::InvalidQuery(
                "Public key is required for advertisement lookup".into(),
            )),
        }
    }
}
