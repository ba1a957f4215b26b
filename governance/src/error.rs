use blan_types::{Address, Timestamp};
use thiserror::Error;

use crate::proposal::{ProposalId, ProposalStatus};

/// Broad class of a governance failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller lacks voting weight; recoverable by acquiring more.
    Eligibility,
    /// A phase boundary has not been reached, or has been passed for good.
    Timing,
    /// Caller logic error. Never retried automatically.
    Integrity,
    /// The target contract, configuration or persistence layer failed.
    Collaborator,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("proposer weight {have} is below the proposal threshold {need}")]
    InsufficientWeight { have: u128, need: u128 },

    #[error("{0} has no voting weight")]
    ZeroWeight(Address),

    #[error("voting on proposal {id} has not ended (ends at {ends_at})")]
    VotingNotEnded { id: ProposalId, ends_at: Timestamp },

    #[error("timelock on proposal {id} has not elapsed (executable at {eta})")]
    TimelockNotElapsed { id: ProposalId, eta: Timestamp },

    #[error("execution window for proposal {id} closed at {deadline}")]
    WindowExpired { id: ProposalId, deadline: Timestamp },

    #[error("proposal {id} is not open for voting (status {status})")]
    NotActive { id: ProposalId, status: ProposalStatus },

    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { id: ProposalId, voter: Address },

    #[error("proposal {0} has already been finalized")]
    AlreadyFinalized(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("invalid vote support {0}: expected 0 (against), 1 (for) or 2 (abstain)")]
    InvalidSupport(u8),

    #[error("proposal {id} has status {status}, which does not permit this action")]
    WrongStatus { id: ProposalId, status: ProposalStatus },

    #[error("only the proposer can cancel proposal {0}")]
    NotProposer(ProposalId),

    #[error("description is {len} bytes, limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("target contract refused caller {0}")]
    Unauthorized(Address),

    #[error("target contract rejected the change: {0}")]
    ExecutionFailed(String),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientWeight { .. } | Self::ZeroWeight(_) => ErrorKind::Eligibility,
            Self::VotingNotEnded { .. }
            | Self::TimelockNotElapsed { .. }
            | Self::WindowExpired { .. }
            | Self::NotActive { .. } => ErrorKind::Timing,
            Self::AlreadyVoted { .. }
            | Self::AlreadyFinalized(_)
            | Self::AlreadyExecuted(_)
            | Self::NotFound(_)
            | Self::InvalidSupport(_)
            | Self::WrongStatus { .. }
            | Self::NotProposer(_)
            | Self::DescriptionTooLong { .. }
            | Self::InvalidPayload(_)
            | Self::Overflow => ErrorKind::Integrity,
            Self::Unauthorized(_)
            | Self::ExecutionFailed(_)
            | Self::Config(_)
            | Self::Serialization(_) => ErrorKind::Collaborator,
        }
    }
}
