//! # Adapters
//!
//! Port implementations connecting the subsystems to the outside world.

pub mod beef_store;
pub mod storage;
pub mod wallet;

pub use beef_store::KvBeefStore;
pub use wallet::HttpWalletClient;
