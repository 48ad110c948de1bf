//! # PushDrop Codec (am-02)
//!
//! Decodes and builds PushDrop locking scripts, and maps the positional
//! fields of an advertisement token onto a named structure.
//!
//! ## Script Layout
//!
//! ```text
//! <pubkey:33> OP_CHECKSIG <field_0> ... <field_n-1> OP_2DROP... [OP_DROP]
//! ```
//!
//! The output is spendable by the holder of `pubkey`; the fields ride along
//! and are dropped from the stack before the signature check.
//!
//! ## Advertisement Fields
//!
//! | Index | Meaning |
//! |-------|---------|
//! | 0 | protocol marker [`PROTOCOL_MARKER`] |
//! | 1 | title |
//! | 2 | description |
//! | 3 | media reference (UHRP URL) |
//! | 4 | expiry, RFC 3339 |
//! | 5 | sponsor public key, hex |
//! | 6 | reward per correct answer, decimal satoshis |
//! | 7 | service URL |
//!
//! Wallet-built tokens append a signature as a ninth field; it is ignored.

pub mod domain;

pub use domain::{
    errors::{PushDropError, TokenError},
    pushdrop::{minimal_push, PushDrop, PushDropToken},
    token::{AdvertisementToken, ADVERTISEMENT_FIELD_COUNT, MIN_ADMISSIBLE_FIELDS, PROTOCOL_MARKER},
};
