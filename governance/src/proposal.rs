//! Governance proposals and their lifecycle.

use blan_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GovernanceError;
use crate::ledger::Support;
use crate::params::GovernanceParams;

/// Sequential proposal identifier, starting at 0. Never reused.
pub type ProposalId = u64;

/// Lifecycle status of a proposal.
///
/// `Pending` and `Active` are time-derived; the rest are committed by
/// finalize, execute or cancel. See [`crate::status::resolve_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Created; voting has not started.
    Pending,
    /// Inside the voting window.
    Active,
    /// Voting ended without quorum or without a for-majority.
    Defeated,
    /// Voting ended with quorum and a for-majority.
    Succeeded,
    /// Succeeded and waiting in the timelock or execution window.
    Queued,
    /// The change was applied to the target.
    Executed,
    /// The execution window lapsed before anyone executed.
    Expired,
    /// Withdrawn by the proposer before finalization.
    Canceled,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Executed => "executed",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
        }
    }

    /// No further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Defeated | Self::Executed | Self::Expired | Self::Canceled
        )
    }

    /// Whether a stored status has been committed past the voting phases.
    pub fn is_committed(&self) -> bool {
        !matches!(self, Self::Pending | Self::Active)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the mining contract a proposal may change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetParam {
    MiningDifficulty,
    MiningReward,
}

impl TargetParam {
    /// Human-readable name of this parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MiningDifficulty => "mining_difficulty",
            Self::MiningReward => "mining_reward",
        }
    }
}

/// What a proposal changes: one parameter, one new value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPayload {
    pub param: TargetParam,
    pub new_value: u128,
}

impl ProposalPayload {
    pub fn difficulty(new_value: u128) -> Self {
        Self {
            param: TargetParam::MiningDifficulty,
            new_value,
        }
    }

    pub fn reward(new_value: u128) -> Self {
        Self {
            param: TargetParam::MiningReward,
            new_value,
        }
    }

    /// A zero difficulty would make every hash a valid solution.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.param == TargetParam::MiningDifficulty && self.new_value == 0 {
            return Err(GovernanceError::InvalidPayload(
                "mining difficulty must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ProposalPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.param.name(), self.new_value)
    }
}

/// A governance proposal.
///
/// `status` holds the committed status only; read the effective status
/// through the engine, which resolves it against the clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub payload: ProposalPayload,
    pub description: String,
    pub created_at: Timestamp,
    pub voting_starts: Timestamp,
    pub voting_ends: Timestamp,
    pub for_votes: u128,
    pub against_votes: u128,
    pub abstain_votes: u128,
    pub status: ProposalStatus,
    pub executed: bool,
    pub finalized_at: Option<Timestamp>,
    pub queued_at: Option<Timestamp>,
}

impl Proposal {
    /// Fails with [`GovernanceError::Overflow`] when a phase boundary
    /// would land past `u64::MAX`.
    pub(crate) fn new(
        id: ProposalId,
        proposer: Address,
        payload: ProposalPayload,
        description: String,
        now: Timestamp,
        params: &GovernanceParams,
    ) -> Result<Self, GovernanceError> {
        let voting_starts = now
            .checked_plus(params.voting_delay_secs)
            .ok_or(GovernanceError::Overflow)?;
        let voting_ends = voting_starts
            .checked_plus(params.voting_period_secs)
            .ok_or(GovernanceError::Overflow)?;
        Ok(Self {
            id,
            proposer,
            payload,
            description,
            created_at: now,
            voting_starts,
            voting_ends,
            for_votes: 0,
            against_votes: 0,
            abstain_votes: 0,
            status: ProposalStatus::Pending,
            executed: false,
            finalized_at: None,
            queued_at: None,
        })
    }

    /// Accumulated weight for one side.
    pub fn tally(&self, support: Support) -> u128 {
        match support {
            Support::Against => self.against_votes,
            Support::For => self.for_votes,
            Support::Abstain => self.abstain_votes,
        }
    }

    pub(crate) fn tally_mut(&mut self, support: Support) -> &mut u128 {
        match support {
            Support::Against => &mut self.against_votes,
            Support::For => &mut self.for_votes,
            Support::Abstain => &mut self.abstain_votes,
        }
    }

    /// Total participating weight (for + against + abstain).
    pub fn participation(&self) -> u128 {
        self.for_votes
            .saturating_add(self.against_votes)
            .saturating_add(self.abstain_votes)
    }

    /// Earliest execution time, once queued.
    pub fn execution_eta(&self, params: &GovernanceParams) -> Option<Timestamp> {
        self.queued_at.map(|q| q.plus(params.execution_delay_secs))
    }

    /// Last second at which execution is still allowed, once queued.
    pub fn execution_deadline(&self, params: &GovernanceParams) -> Option<Timestamp> {
        self.execution_eta(params)
            .map(|eta| eta.plus(params.execution_window_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(now: u64) -> Proposal {
        Proposal::new(
            0,
            Address::derive("proposer"),
            ProposalPayload::difficulty(1100),
            "Adjust difficulty".into(),
            Timestamp::new(now),
            &GovernanceParams::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_proposal_orders_phase_boundaries() {
        let p = sample(1_000);
        assert!(p.voting_ends > p.voting_starts);
        assert!(p.voting_starts > p.created_at);
        assert_eq!(p.voting_starts, Timestamp::new(1_000 + 86_400));
        assert_eq!(p.voting_ends, Timestamp::new(1_000 + 86_400 + 604_800));
        assert_eq!(p.status, ProposalStatus::Pending);
        assert!(!p.executed);
        assert_eq!(p.participation(), 0);
    }

    #[test]
    fn execution_bounds_follow_queue_time() {
        let params = GovernanceParams::default();
        let mut p = sample(0);
        assert_eq!(p.execution_eta(&params), None);
        p.queued_at = Some(Timestamp::new(100));
        assert_eq!(p.execution_eta(&params), Some(Timestamp::new(100 + 172_800)));
        assert_eq!(
            p.execution_deadline(&params),
            Some(Timestamp::new(100 + 172_800 + 1_209_600))
        );
    }

    #[test]
    fn tally_mut_targets_matching_side() {
        let mut p = sample(0);
        *p.tally_mut(Support::For) += 5;
        *p.tally_mut(Support::Abstain) += 2;
        assert_eq!(p.tally(Support::For), 5);
        assert_eq!(p.tally(Support::Against), 0);
        assert_eq!(p.participation(), 7);
    }

    #[test]
    fn boundary_past_u64_max_is_overflow() {
        let result = Proposal::new(
            0,
            Address::derive("proposer"),
            ProposalPayload::difficulty(1),
            String::new(),
            Timestamp::new(u64::MAX - 1_000),
            &GovernanceParams::default(),
        );
        assert_eq!(result, Err(GovernanceError::Overflow));
    }

    #[test]
    fn zero_difficulty_payload_rejected() {
        assert!(ProposalPayload::difficulty(0).validate().is_err());
        assert!(ProposalPayload::reward(0).validate().is_ok());
        assert!(ProposalPayload::difficulty(1).validate().is_ok());
    }

    #[test]
    fn terminal_and_committed_classification() {
        assert!(!ProposalStatus::Pending.is_committed());
        assert!(!ProposalStatus::Active.is_committed());
        assert!(ProposalStatus::Succeeded.is_committed());
        assert!(!ProposalStatus::Succeeded.is_terminal());
        assert!(ProposalStatus::Expired.is_terminal());
        assert_eq!(ProposalStatus::Queued.to_string(), "queued");
    }
}
