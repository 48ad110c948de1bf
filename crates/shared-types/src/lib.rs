//! # Shared Types Crate
//!
//! Types that cross subsystem boundaries in the ad-marketplace overlay.
//!
//! ## Contents
//!
//! - `entities` - Transaction ids, output references, satoshi amounts
//! - `overlay` - Admission instructions, lookup questions and answers, and
//!   the `TopicManager` / `LookupService` capability traits
//! - `storage` - The `KeyValueStore` driven port plus an in-memory adapter
//! - `time` - Wall-clock abstraction used by every expiry check
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Overlay wire shapes are defined once, here.
//! - **Required Capabilities**: Optional overlay hooks are trait methods with
//!   no-op default bodies, never absent members.

pub mod entities;
pub mod errors;
pub mod overlay;
pub mod storage;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use overlay::*;
pub use storage::{BatchOperation, InMemoryKVStore, KeyValueStore, ScanResult};
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
