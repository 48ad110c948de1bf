//! Storage adapters.

pub mod kv_store;
