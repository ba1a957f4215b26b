//! Status resolution and outcome computation.
//!
//! Every read and every mutating call derives the effective status through
//! [`resolve_status`], so what a query reports and what a mutation acts on
//! can never diverge.

use blan_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalStatus};

/// Result of evaluating a proposal's tallies against quorum and majority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub for_votes: u128,
    pub against_votes: u128,
    pub abstain_votes: u128,
    /// Participation required at the total supply used for evaluation.
    pub quorum: u128,
    pub quorum_met: bool,
    /// Strictly more weight for than against.
    pub approved: bool,
}

impl Outcome {
    pub fn evaluate(proposal: &Proposal, params: &GovernanceParams, total_supply: u128) -> Self {
        let quorum = params.quorum(total_supply);
        Self {
            for_votes: proposal.for_votes,
            against_votes: proposal.against_votes,
            abstain_votes: proposal.abstain_votes,
            quorum,
            quorum_met: proposal.participation() >= quorum,
            approved: proposal.for_votes > proposal.against_votes,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.quorum_met && self.approved
    }

    pub fn status(&self) -> ProposalStatus {
        if self.succeeded() {
            ProposalStatus::Succeeded
        } else {
            ProposalStatus::Defeated
        }
    }
}

/// The effective status of `proposal` at `now`.
///
/// - Uncommitted proposals are `Pending` before `voting_starts`, `Active`
///   until `voting_ends`, then report the outcome finalize would commit.
/// - A finalized success reads `Queued` until the execution window closes
///   and `Expired` afterwards, whether or not anyone has called execute.
/// - Every other committed status is returned as stored.
pub fn resolve_status(
    proposal: &Proposal,
    now: Timestamp,
    params: &GovernanceParams,
    total_supply: u128,
) -> ProposalStatus {
    match proposal.status {
        ProposalStatus::Pending | ProposalStatus::Active => {
            if now < proposal.voting_starts {
                ProposalStatus::Pending
            } else if now < proposal.voting_ends {
                ProposalStatus::Active
            } else {
                Outcome::evaluate(proposal, params, total_supply).status()
            }
        }
        ProposalStatus::Succeeded | ProposalStatus::Queued => {
            match proposal.execution_deadline(params) {
                Some(deadline) if now > deadline => ProposalStatus::Expired,
                Some(_) => ProposalStatus::Queued,
                None => ProposalStatus::Succeeded,
            }
        }
        committed => committed,
    }
}
