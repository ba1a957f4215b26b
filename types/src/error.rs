//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised by the leaf types themselves.
#[derive(Debug, Error)]
pub enum BlanError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
