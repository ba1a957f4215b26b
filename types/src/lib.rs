//! Fundamental types for BLAN governance.
//!
//! This crate defines the leaf types shared across every other crate in the
//! workspace: addresses, timestamps and token amounts.

pub mod address;
pub mod amount;
pub mod error;
pub mod time;

pub use address::Address;
pub use amount::{format_tokens, tokens, TOKEN_UNIT};
pub use error::BlanError;
pub use time::Timestamp;
