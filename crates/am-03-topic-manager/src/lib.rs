//! # Advertisement Topic Manager (am-03)
//!
//! Decides which outputs of a submitted transaction belong to the
//! `tm_advertisement` topic.
//!
//! ## Admission Rules
//!
//! An output is admitted when its locking script:
//!
//! 1. starts with a 33-byte push (`0x21`),
//! 2. decodes as a PushDrop token with at least four fields,
//! 3. carries the protocol marker in field 0.
//!
//! Outputs are judged independently. A bad output is logged and skipped; an
//! unparseable bundle admits nothing. The filter is stateless and never
//! touches storage.

pub mod docs;
pub mod domain;
pub mod service;

pub use domain::admission::{classify_output, AdmissionReport, OutputVerdict, RejectionReason};
pub use service::AdvertisementTopicManager;
