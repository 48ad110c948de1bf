//! Storage adapters.

pub mod kv_storage;
