//! # Advertisement Lookup Service (am-04)
//!
//! Indexes admitted advertisement tokens and answers `ls_advertisement`
//! queries.
//!
//! ## Query Precedence
//!
//! | Query | Result shape |
//! |-------|--------------|
//! | `{"findAll": true}` | output list with each transaction's BEEF |
//! | `{"ids": [txid, ...]}` | formula of `{txid, outputIndex}` |
//! | `{"publicKey": sponsor}` | formula of `{txid, outputIndex}` |
//!
//! Every query only sees advertisements whose end date is still in the
//! future. Spent or deleted outputs stay indexed; the end date is the only
//! thing that retires an advertisement.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): records, query parsing, errors
//! - **Ports Layer** (`ports/`): `AdvertisementStorage`, `TransactionBundleProvider`
//! - **Adapters Layer** (`adapters/`): `KvAdvertisementStorage` over `KeyValueStore`
//! - **Service Layer** (`service.rs`): the `LookupService` implementation

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::kv_storage::KvAdvertisementStorage;
pub use config::LookupConfig;
pub use domain::{
    entities::AdvertisementRecord,
    errors::{LookupError, StorageError},
    query::LookupQuery,
};
pub use ports::outbound::{AdvertisementStorage, StoreOutcome, TransactionBundleProvider};
pub use service::AdvertisementLookupService;
