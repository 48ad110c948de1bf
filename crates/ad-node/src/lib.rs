//! # Ad-Marketplace Node
//!
//! Hosts the advertisement overlay services and the campaign reward backend
//! behind one HTTP surface.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and subsystem wiring
//! - `adapters/` - RocksDB store, bundle store, HTTP wallet
//! - `host` - overlay submit/lookup orchestration
//! - `http/` - axum routes and error bodies
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment)
//! 2. Validate the server key and collection names
//! 3. Open storage and the wallet client
//! 4. Build subsystems, serve HTTP until Ctrl+C

pub mod adapters;
pub mod container;
pub mod host;
pub mod http;

pub use container::{AdNode, NodeConfig};
pub use host::{HostError, OverlayHost, Steak};
pub use http::{build_router, AppState};
