//! Read-only views over the registry. No method here has side effects.

use blan_types::Address;

use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::ledger::VoteRecord;
use crate::proposal::{Proposal, ProposalId, ProposalStatus};
use crate::status::Outcome;

impl GovernanceEngine {
    /// The committed proposal record.
    ///
    /// `status` on the returned record is the committed status; use
    /// [`GovernanceEngine::state`] for the time-resolved one.
    pub fn get_proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.record(id).map(|r| &r.proposal)
    }

    /// The vote `account` cast on proposal `id`, or an empty record
    /// (`has_voted == false`) if it has not voted.
    pub fn get_vote(&self, id: ProposalId, account: &Address) -> Result<VoteRecord, GovernanceError> {
        let record = self.record(id)?;
        Ok(record.ledger.get(account).copied().unwrap_or_default())
    }

    pub fn has_voted(&self, id: ProposalId, account: &Address) -> Result<bool, GovernanceError> {
        Ok(self.record(id)?.ledger.has_voted(account))
    }

    /// Number of proposals ever created. Ids run from 0 to this value.
    pub fn proposal_count(&self) -> u64 {
        self.next_id
    }

    /// Every proposal, ascending by id. Failed and expired ones included.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> + '_ {
        self.registry.values().map(|r| &r.proposal)
    }

    /// Ids of proposals whose resolved status is `status`.
    pub fn proposals_in_state(&self, status: ProposalStatus) -> Vec<ProposalId> {
        self.registry
            .values()
            .filter(|r| self.resolve(&r.proposal) == status)
            .map(|r| r.proposal.id)
            .collect()
    }

    /// All vote records on a proposal, ordered by voter.
    pub fn votes(&self, id: ProposalId) -> Result<Vec<(Address, VoteRecord)>, GovernanceError> {
        Ok(self.record(id)?.ledger.sorted())
    }

    /// Tallies evaluated against the quorum at the current total supply.
    pub fn outcome(&self, id: ProposalId) -> Result<Outcome, GovernanceError> {
        let record = self.record(id)?;
        Ok(Outcome::evaluate(
            &record.proposal,
            &self.params,
            self.oracle.total_supply(),
        ))
    }
}
