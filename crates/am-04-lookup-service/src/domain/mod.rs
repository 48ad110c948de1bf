//! Domain layer for the lookup index.

pub mod entities;
pub mod errors;
pub mod query;
