//! # Admission Verdicts

use am_01_transaction_bundle::{BundleError, LockingScript, Transaction};
use am_02_pushdrop::{PushDrop, PushDropError, MIN_ADMISSIBLE_FIELDS, PROTOCOL_MARKER};
use shared_types::{AdmittanceInstructions, OutputIndex, Txid};
use thiserror::Error;

/// `OP_PUSHBYTES_33`, the first byte of every PushDrop token.
const PUSH_33: u8 = 0x21;

/// Why an output was not admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("script does not start with a 33-byte push")]
    NotPushDrop,

    #[error("PushDrop decode failed: {0}")]
    Decode(#[from] PushDropError),

    #[error("expected at least {expected} fields, got {actual}")]
    TooFewFields { expected: usize, actual: usize },

    #[error("protocol marker mismatch: {0:?}")]
    MarkerMismatch(String),
}

impl RejectionReason {
    /// The output belongs to some other protocol, as opposed to being a
    /// malformed advertisement.
    pub fn is_protocol_mismatch(&self) -> bool {
        matches!(self, Self::NotPushDrop | Self::MarkerMismatch(_))
    }
}

/// Decide a single output on its locking script alone.
pub fn classify_output(script: &LockingScript) -> Result<(), RejectionReason> {
    if script.first_byte() != Some(PUSH_33) {
        return Err(RejectionReason::NotPushDrop);
    }

    let token = PushDrop::decode(script)?;
    if token.fields.len() < MIN_ADMISSIBLE_FIELDS {
        return Err(RejectionReason::TooFewFields {
            expected: MIN_ADMISSIBLE_FIELDS,
            actual: token.fields.len(),
        });
    }

    let marker = String::from_utf8_lossy(&token.fields[0]);
    if marker != PROTOCOL_MARKER {
        return Err(RejectionReason::MarkerMismatch(marker.into_owned()));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputVerdict {
    pub output_index: OutputIndex,
    pub outcome: Result<(), RejectionReason>,
}

impl OutputVerdict {
    pub fn is_admitted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-output verdicts for one submitted bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionReport {
    /// Subject transaction id, when the bundle parsed.
    pub txid: Option<Txid>,
    /// Set when the bundle itself could not be read.
    pub bundle_error: Option<BundleError>,
    pub verdicts: Vec<OutputVerdict>,
}

impl AdmissionReport {
    pub fn evaluate(beef: &[u8]) -> Self {
        let transaction = match Transaction::from_beef(beef) {
            Ok(tx) => tx,
            Err(e) => {
                return Self {
                    txid: None,
                    bundle_error: Some(e),
                    verdicts: Vec::new(),
                }
            }
        };

        let verdicts = transaction
            .outputs
            .iter()
            .enumerate()
            .map(|(index, output)| OutputVerdict {
                output_index: index as OutputIndex,
                outcome: classify_output(&output.locking_script),
            })
            .collect();

        Self {
            txid: Some(transaction.id()),
            bundle_error: None,
            verdicts,
        }
    }

    /// Admitted output indices, ascending.
    pub fn admitted(&self) -> Vec<OutputIndex> {
        self.verdicts
            .iter()
            .filter(|v| v.is_admitted())
            .map(|v| v.output_index)
            .collect()
    }

    pub fn rejected(&self) -> impl Iterator<Item = (OutputIndex, &RejectionReason)> {
        self.verdicts
            .iter()
            .filter_map(|v| v.outcome.as_ref().err().map(|reason| (v.output_index, reason)))
    }

    pub fn instructions(&self) -> AdmittanceInstructions {
        AdmittanceInstructions {
            outputs_to_admit: self.admitted(),
            coins_to_retain: Vec::new(),
        }
    }
}
