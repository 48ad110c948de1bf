//! Domain layer: per-output admission verdicts.

pub mod admission;
