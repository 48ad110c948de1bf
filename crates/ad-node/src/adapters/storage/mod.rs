//! # Storage Adapters
//!
//! `KeyValueStore` backends selectable at startup.
//!
//! - `RocksDbStore`: persistent, behind the `rocksdb` feature
//! - `InMemoryKVStore` (shared-types): ephemeral nodes and tests

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};
