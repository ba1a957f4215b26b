//! Nullable infrastructure for deterministic testing.
//!
//! The engine's collaborators (clock, balance oracle, target contract) are
//! abstracted behind traits in `blan-governance`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what was asked of them
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod oracle;
pub mod target;

pub use clock::NullClock;
pub use oracle::NullOracle;
pub use target::NullTarget;
