//! The collaborators the engine depends on.
//!
//! All three are synchronous point-in-time queries or calls; nothing here
//! blocks on external input. Test doubles live in `blan-nullables`, the
//! production implementations in `blan-token`.

use blan_types::{Address, Timestamp};
use thiserror::Error;

use crate::proposal::ProposalPayload;

/// Monotonically non-decreasing time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Voting-weight source, read live at call time.
pub trait BalanceOracle: Send + Sync {
    fn balance_of(&self, account: &Address) -> u128;
    fn total_supply(&self) -> u128;
}

/// Why a target contract refused a change.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("caller {caller} is not the owner")]
    Unauthorized { caller: Address },

    #[error("{0}")]
    Rejected(String),
}

/// The ownable contract whose parameters governance controls.
///
/// `apply_change` must only succeed when `caller` is the contract owner,
/// which in production is the governance engine's address.
pub trait TargetContract: Send + Sync {
    fn apply_change(&self, caller: &Address, payload: &ProposalPayload) -> Result<(), TargetError>;
}
