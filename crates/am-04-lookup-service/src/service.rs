//! # Lookup Service
//!
//! Implements [`LookupService`] for `ls_advertisement` over the storage and
//! bundle ports.

use std::collections::HashMap;

use am_01_transaction_bundle::LockingScript;
use am_02_pushdrop::{AdvertisementToken, PushDrop};
use async_trait::async_trait;
use shared_types::{
    LookupAnswer, LookupQuestion, LookupResponse, LookupService, OutputIndex, OutputListEntry,
    ServiceMetadata, TimeSource, Txid, UtxoReference, ADVERTISEMENT_LOOKUP_SERVICE,
    ADVERTISEMENT_TOPIC,
};
use tracing::{debug, error, info, warn};

use crate::config::LookupConfig;
use crate::domain::entities::AdvertisementRecord;
use crate::domain::errors::LookupError;
use crate::domain::query::LookupQuery;
use crate::ports::outbound::{AdvertisementStorage, StoreOutcome, TransactionBundleProvider};

pub const LOOKUP_SERVICE_NAME: &str = "Advertisement Lookup Service";
pub const LOOKUP_SERVICE_SHORT_DESCRIPTION: &str = "Lookup service for advertisement content";

const LOOKUP_DOCUMENTATION: &str = r#"# Advertisement Lookup Service

Send a `LookupQuestion` with `service: "ls_advertisement"` and one of:

- `{"findAll": true}`: every running advertisement, with transaction bundles
- `{"ids": ["<txid>", ...]}`: running advertisements created by these transactions
- `{"publicKey": "<sponsor key>"}`: running advertisements of one sponsor

Advertisements stop appearing once their end date has passed.
"#;

pub struct AdvertisementLookupService<S, B, TS> {
    storage: S,
    bundles: B,
    time_source: TS,
    config: LookupConfig,
}

impl<S, B, TS> AdvertisementLookupService<S, B, TS>
where
    S: AdvertisementStorage,
    B: TransactionBundleProvider,
    TS: TimeSource,
{
    pub fn new(storage: S, bundles: B, time_source: TS, config: LookupConfig) -> Self {
        Self {
            storage,
            bundles,
            time_source,
            config,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Outpoint reported to callers. Records always keep their true index.
    fn reported_outpoint(&self, record: &AdvertisementRecord) -> UtxoReference {
        if self.config.legacy_zero_output_index {
            UtxoReference::new(record.txid, 0)
        } else {
            record.outpoint()
        }
    }

    fn formula(&self, records: Vec<AdvertisementRecord>) -> LookupResponse {
        LookupResponse::Formula(records.iter().map(|r| self.reported_outpoint(r)).collect())
    }

    fn decode(output_script: &[u8]) -> Result<AdvertisementToken, String> {
        let script = LockingScript::from_bytes(output_script);
        let token = PushDrop::decode(&script).map_err(|e| e.to_string())?;
        AdvertisementToken::try_from_fields(&token.fields).map_err(|e| e.to_string())
    }

    async fn output_list(&self, records: Vec<AdvertisementRecord>) -> Result<LookupResponse, LookupError> {
        let mut bundles: HashMap<Txid, Option<Vec<u8>>> = HashMap::new();
        let mut outputs = Vec::with_capacity(records.len());

        for record in records {
            if !bundles.contains_key(&record.txid) {
                let bundle = self.bundles.bundle_for(&record.txid).await?;
                bundles.insert(record.txid, bundle);
            }
            match bundles.get(&record.txid).and_then(Option::as_ref) {
                Some(beef) => outputs.push(OutputListEntry {
                    txid: record.txid,
                    output_index: self.reported_outpoint(&record).output_index,
                    beef: beef.clone(),
                }),
                None => warn!(
                    "[am-04] No bundle stored for {}, omitting it from the answer",
                    record.outpoint()
                ),
            }
        }

        Ok(LookupResponse::Answer(LookupAnswer::OutputList { outputs }))
    }
}

#[async_trait]
impl<S, B, TS> LookupService for AdvertisementLookupService<S, B, TS>
where
    S: AdvertisementStorage,
    B: TransactionBundleProvider,
    TS: TimeSource,
{
    type Error = LookupError;

    async fn output_added(&self, txid: Txid, output_index: OutputIndex, output_script: &[u8], topic: &str) {
        if topic != ADVERTISEMENT_TOPIC {
            debug!("[am-04] Skipping {}.{} on topic {}", txid, output_index, topic);
            return;
        }

        let token = match Self::decode(output_script) {
            Ok(token) => token,
            Err(e) => {
                warn!("[am-04] Not indexing {}.{}: {}", txid, output_index, e);
                return;
            }
        };

        let record = AdvertisementRecord::from_token(txid, output_index, token, self.time_source.now());

        match self.storage.store_record(record).await {
            Ok(StoreOutcome::Inserted) => {
                info!(
                    txid = %txid,
                    output_index,
                    "[am-04] Indexed advertisement"
                )
            }
            Ok(StoreOutcome::AlreadyIndexed) => {
                debug!("[am-04] {}.{} already indexed", txid, output_index)
            }
            Err(e) => error!("[am-04] Failed to store {}.{}: {}", txid, output_index, e),
        }
    }

    async fn output_spent(&self, txid: Txid, output_index: OutputIndex, topic: &str) {
        debug!(
            "[am-04] Output {}.{} spent on {}; record kept until its end date",
            txid, output_index, topic
        );
    }

    async fn output_deleted(&self, txid: Txid, output_index: OutputIndex, topic: &str) {
        debug!(
            "[am-04] Output {}.{} deleted on {}; record kept until its end date",
            txid, output_index, topic
        );
    }

    async fn lookup(&self, question: &LookupQuestion) -> Result<LookupResponse, LookupError> {
        if question.service != ADVERTISEMENT_LOOKUP_SERVICE {
            return Err(LookupError::UnsupportedService(question.service.clone()));
        }
        let query = question
            .query
            .as_ref()
            .ok_or_else(|| LookupError::InvalidQuery("A valid query must be provided".into()))?;

        let response = match LookupQuery::parse(query)? {
            LookupQuery::FindAll => {
                let records = self.storage.find_all().await?;
                self.output_list(records).await?
            }
            LookupQuery::ByIds(txids) => self.formula(self.storage.find_by_ids(&txids).await?),
            LookupQuery::BySponsor(sponsor) => self.formula(self.storage.find_by_sponsor(&sponsor).await?),
        };

        debug!("[am-04] Lookup answered with {} output(s)", response.len());
        Ok(response)
    }

    async fn documentation(&self) -> String {
        LOOKUP_DOCUMENTATION.to_string()
    }

    async fn metadata(&self) -> ServiceMetadata {
        ServiceMetadata::new(LOOKUP_SERVICE_NAME, LOOKUP_SERVICE_SHORT_DESCRIPTION)
    }
}
