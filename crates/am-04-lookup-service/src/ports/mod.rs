//! # Ports Layer
//!
//! Driven ports the lookup service depends on.

pub mod outbound;

pub use outbound::*;
