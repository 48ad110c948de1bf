//! # Ad-Marketplace Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # tokens, transactions, bundles, wallets, nodes
//! └── integration/      # end-to-end flows across subsystems
//!     ├── admission_flow.rs   # submit -> admit -> index -> lookup
//!     ├── campaign_flow.rs    # fund -> submit answers -> payout
//!     └── http_flow.rs        # the same through the axum router
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p am-tests
//! cargo test -p am-tests integration::campaign_flow
//! cargo bench -p am-tests
//! ```

pub mod fixtures;
pub mod integration;
