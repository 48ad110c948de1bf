//! # Domain Layer
//!
//! Pure parsing and encoding logic; no I/O.

pub mod beef;
pub mod codec;
pub mod errors;
pub mod script;
pub mod transaction;
