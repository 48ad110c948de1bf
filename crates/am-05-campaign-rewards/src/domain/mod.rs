//! Domain layer: records, request validation, scoring and key handling.

pub mod entities;
pub mod errors;
pub mod keys;
pub mod requests;
pub mod scoring;
pub mod wallet;
