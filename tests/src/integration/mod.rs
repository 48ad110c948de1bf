//! Cross-subsystem flows.

pub mod admission_flow;
pub mod campaign_flow;
pub mod http_flow;
