//! The BLAN token and the mining contract it governs.
//!
//! - [`TokenLedger`] holds balances and serves as the governance engine's
//!   balance oracle. Voting weight is whatever the ledger reports at the
//!   moment a vote is cast.
//! - [`MiningContract`] carries the difficulty and reward parameters and
//!   accepts changes only from its owner, normally the governance engine.

pub mod error;
pub mod ledger;
pub mod mining;

pub use error::TokenError;
pub use ledger::{TokenLedger, TokenSnapshot};
pub use mining::{MiningContract, MiningSnapshot};
