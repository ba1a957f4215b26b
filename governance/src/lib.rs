//! Token-weighted governance for the BLAN mining token.
//!
//! Lifecycle: Pending → Active → Succeeded | Defeated → Queued → Executed | Expired.
//! A proposal waits `voting_delay` before voting opens, stays open for
//! `voting_period`, and once finalized as a success sits in a timelock of
//! `execution_delay` followed by an `execution_window` during which anyone
//! may execute it.
//!
//! Voting weight is the voter's live token balance at the moment of casting,
//! not a snapshot. There is no background scheduler: every timed transition
//! is resolved on access.

pub mod engine;
pub mod error;
pub mod events;
pub mod execution;
pub mod interfaces;
pub mod ledger;
pub mod params;
pub mod proposal;
pub mod query;
pub mod snapshot;
pub mod spans;
pub mod status;

#[cfg(test)]
mod testing;

pub use engine::GovernanceEngine;
pub use error::{ErrorKind, GovernanceError};
pub use events::{EventBus, GovernanceEvent};
pub use interfaces::{BalanceOracle, Clock, TargetContract, TargetError};
pub use ledger::{Support, VoteLedger, VoteRecord};
pub use params::GovernanceParams;
pub use proposal::{Proposal, ProposalId, ProposalPayload, ProposalStatus, TargetParam};
pub use status::{resolve_status, Outcome};
