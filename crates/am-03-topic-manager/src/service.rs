//! # Topic Manager Service
//!
//! Wires the admission rules to the host's [`TopicManager`] capability.

use async_trait::async_trait;
use shared_types::{AdmittanceInstructions, OutputIndex, ServiceMetadata, TopicManager};
use tracing::{debug, info, warn};

use crate::docs::{TOPIC_DOCUMENTATION, TOPIC_MANAGER_NAME, TOPIC_MANAGER_SHORT_DESCRIPTION};
use crate::domain::admission::AdmissionReport;

/// Topic manager for `tm_advertisement`.
#[derive(Debug, Clone, Default)]
pub struct AdvertisementTopicManager;

impl AdvertisementTopicManager {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `beef` and log every verdict.
    pub fn admission_report(&self, beef: &[u8]) -> AdmissionReport {
        debug!("[am-03] Evaluating bundle of {} bytes", beef.len());

        let report = AdmissionReport::evaluate(beef);
        if let Some(e) = &report.bundle_error {
            warn!("[am-03] Rejecting bundle: {}", e);
            return report;
        }

        for (index, reason) in report.rejected() {
            if reason.is_protocol_mismatch() {
                debug!("[am-03] Output {} is not an advertisement, skipping: {}", index, reason);
            } else {
                warn!("[am-03] Output {} rejected: {}", index, reason);
            }
        }

        let admitted = report.admitted();
        if admitted.is_empty() {
            warn!("[am-03] No outputs admitted");
        } else {
            info!(
                txid = ?report.txid,
                outputs = ?admitted,
                "[am-03] Admitted {} output(s)",
                admitted.len()
            );
        }
        report
    }
}

#[async_trait]
impl TopicManager for AdvertisementTopicManager {
    async fn identify_admissible_outputs(
        &self,
        beef: &[u8],
        _previous_coins: &[OutputIndex],
    ) -> AdmittanceInstructions {
        self.admission_report(beef).instructions()
    }

    async fn documentation(&self) -> String {
        TOPIC_DOCUMENTATION.to_string()
    }

    async fn metadata(&self) -> ServiceMetadata {
        ServiceMetadata::new(TOPIC_MANAGER_NAME, TOPIC_MANAGER_SHORT_DESCRIPTION)
    }
}
