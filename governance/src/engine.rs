//! Core governance engine: proposal registry and vote accounting.
//!
//! The engine exclusively owns every proposal and its vote ledger. All
//! mutators take `&mut self`, so each operation runs as one atomic,
//! non-interleaved unit. Every check runs before the first write; a rejected
//! call leaves tallies and statuses exactly as they were.

use blan_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent, Listener};
use crate::interfaces::{BalanceOracle, Clock, TargetContract};
use crate::ledger::{Support, VoteLedger, VoteRecord};
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalId, ProposalPayload, ProposalStatus};
use crate::spans;
use crate::status::{resolve_status, Outcome};

/// A proposal together with its vote ledger partition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProposalRecord {
    pub proposal: Proposal,
    pub ledger: VoteLedger,
}

pub struct GovernanceEngine {
    /// Identity presented to the target contract on execution.
    pub(crate) address: Address,
    pub(crate) params: GovernanceParams,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) oracle: Arc<dyn BalanceOracle>,
    pub(crate) target: Arc<dyn TargetContract>,
    pub(crate) registry: BTreeMap<ProposalId, ProposalRecord>,
    pub(crate) next_id: ProposalId,
    pub(crate) events: EventBus,
}

pub(crate) fn log_rejection(err: &GovernanceError) {
    debug!(error = %err, kind = ?err.kind(), "rejected");
}

impl GovernanceEngine {
    pub fn new(
        address: Address,
        params: GovernanceParams,
        clock: Arc<dyn Clock>,
        oracle: Arc<dyn BalanceOracle>,
        target: Arc<dyn TargetContract>,
    ) -> Result<Self, GovernanceError> {
        params.validate()?;
        Ok(Self {
            address,
            params,
            clock,
            oracle,
            target,
            registry: BTreeMap::new(),
            next_id: 0,
            events: EventBus::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.events.subscribe(listener);
    }

    /// Submit a new proposal. Returns its id.
    pub fn propose(
        &mut self,
        requester: &Address,
        payload: ProposalPayload,
        description: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        let _span = spans::propose_span(requester).entered();
        self.try_propose(requester, payload, description.into())
            .inspect_err(log_rejection)
    }

    /// Propose a new mining difficulty.
    pub fn propose_difficulty_change(
        &mut self,
        requester: &Address,
        new_difficulty: u128,
        description: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        self.propose(
            requester,
            ProposalPayload::difficulty(new_difficulty),
            description,
        )
    }

    fn try_propose(
        &mut self,
        requester: &Address,
        payload: ProposalPayload,
        description: String,
    ) -> Result<ProposalId, GovernanceError> {
        payload.validate()?;
        if description.len() > self.params.max_description_len {
            return Err(GovernanceError::DescriptionTooLong {
                len: description.len(),
                max: self.params.max_description_len,
            });
        }
        let balance = self.oracle.balance_of(requester);
        if balance < self.params.proposal_threshold {
            return Err(GovernanceError::InsufficientWeight {
                have: balance,
                need: self.params.proposal_threshold,
            });
        }

        let id = self.next_id;
        let next = id.checked_add(1).ok_or(GovernanceError::Overflow)?;
        let now = self.clock.now();
        let proposal = Proposal::new(id, *requester, payload, description, now, &self.params)?;
        let event = GovernanceEvent::ProposalCreated {
            id,
            proposer: proposal.proposer,
            payload: proposal.payload.clone(),
            description: proposal.description.clone(),
            voting_starts: proposal.voting_starts,
            voting_ends: proposal.voting_ends,
        };
        info!(
            proposal = id,
            payload = %proposal.payload,
            voting_starts = %proposal.voting_starts,
            voting_ends = %proposal.voting_ends,
            "proposal created"
        );
        self.registry.insert(
            id,
            ProposalRecord {
                proposal,
                ledger: VoteLedger::new(),
            },
        );
        self.next_id = next;
        self.events.emit(&event);
        Ok(id)
    }

    /// Cast a vote weighted by the voter's live balance.
    ///
    /// `support` accepts a [`Support`] or its wire value (0, 1, 2).
    pub fn cast_vote(
        &mut self,
        id: ProposalId,
        voter: &Address,
        support: impl Into<u8>,
    ) -> Result<VoteRecord, GovernanceError> {
        let _span = spans::vote_span(id, voter).entered();
        self.try_cast_vote(id, voter, support.into())
            .inspect_err(log_rejection)
    }

    fn try_cast_vote(
        &mut self,
        id: ProposalId,
        voter: &Address,
        raw_support: u8,
    ) -> Result<VoteRecord, GovernanceError> {
        let now = self.clock.now();
        let supply = self.oracle.total_supply();
        let record = self
            .registry
            .get_mut(&id)
            .ok_or(GovernanceError::NotFound(id))?;

        let status = resolve_status(&record.proposal, now, &self.params, supply);
        if status != ProposalStatus::Active {
            return Err(GovernanceError::NotActive { id, status });
        }
        if record.ledger.has_voted(voter) {
            return Err(GovernanceError::AlreadyVoted { id, voter: *voter });
        }
        let support = Support::try_from(raw_support)?;
        let weight = self.oracle.balance_of(voter);
        if weight == 0 {
            return Err(GovernanceError::ZeroWeight(*voter));
        }
        let updated = record
            .proposal
            .tally(support)
            .checked_add(weight)
            .ok_or(GovernanceError::Overflow)?;

        let vote = record
            .ledger
            .record(*voter, support, weight, now)
            .ok_or(GovernanceError::AlreadyVoted { id, voter: *voter })?;
        *record.proposal.tally_mut(support) = updated;

        info!(
            proposal = id,
            voter = %voter,
            support = support.as_str(),
            weight,
            "vote cast"
        );
        self.events.emit(&GovernanceEvent::VoteCast {
            id,
            voter: *voter,
            support,
            weight,
        });
        Ok(vote)
    }

    /// Commit the outcome of a proposal whose voting window has closed.
    ///
    /// Anyone may call this. Returns the committed outcome, `Succeeded` or
    /// `Defeated`. A success is queued at the current time.
    pub fn finalize_proposal(&mut self, id: ProposalId) -> Result<ProposalStatus, GovernanceError> {
        let _span = spans::finalize_span(id).entered();
        self.try_finalize(id).inspect_err(log_rejection)
    }

    fn try_finalize(&mut self, id: ProposalId) -> Result<ProposalStatus, GovernanceError> {
        let now = self.clock.now();
        let supply = self.oracle.total_supply();
        let record = self
            .registry
            .get_mut(&id)
            .ok_or(GovernanceError::NotFound(id))?;
        let proposal = &mut record.proposal;

        if proposal.status.is_committed() {
            return Err(GovernanceError::AlreadyFinalized(id));
        }
        if now < proposal.voting_ends {
            return Err(GovernanceError::VotingNotEnded {
                id,
                ends_at: proposal.voting_ends,
            });
        }

        let outcome = Outcome::evaluate(proposal, &self.params, supply);
        let status = outcome.status();
        proposal.status = status;
        proposal.finalized_at = Some(now);
        if status == ProposalStatus::Succeeded {
            proposal.queued_at = Some(now);
        }

        info!(
            proposal = id,
            outcome = %status,
            for_votes = outcome.for_votes,
            against_votes = outcome.against_votes,
            abstain_votes = outcome.abstain_votes,
            quorum = outcome.quorum,
            "proposal finalized"
        );
        self.events.emit(&GovernanceEvent::ProposalFinalized {
            id,
            outcome: status,
            for_votes: outcome.for_votes,
            against_votes: outcome.against_votes,
            abstain_votes: outcome.abstain_votes,
            quorum: outcome.quorum,
        });
        Ok(status)
    }

    /// Withdraw a proposal before its voting window closes. Proposer only.
    pub fn cancel_proposal(&mut self, id: ProposalId, caller: &Address) -> Result<(), GovernanceError> {
        let _span = spans::cancel_span(id, caller).entered();
        self.try_cancel(id, caller).inspect_err(log_rejection)
    }

    fn try_cancel(&mut self, id: ProposalId, caller: &Address) -> Result<(), GovernanceError> {
        let now = self.clock.now();
        let supply = self.oracle.total_supply();
        let record = self
            .registry
            .get_mut(&id)
            .ok_or(GovernanceError::NotFound(id))?;
        let proposal = &mut record.proposal;

        let status = resolve_status(proposal, now, &self.params, supply);
        if !matches!(status, ProposalStatus::Pending | ProposalStatus::Active) {
            return Err(GovernanceError::WrongStatus { id, status });
        }
        if proposal.proposer != *caller {
            return Err(GovernanceError::NotProposer(id));
        }
        proposal.status = ProposalStatus::Canceled;
        proposal.finalized_at = Some(now);

        info!(proposal = id, "proposal canceled");
        self.events.emit(&GovernanceEvent::ProposalCanceled { id });
        Ok(())
    }

    /// Effective status right now, via the shared resolution function.
    pub fn state(&self, id: ProposalId) -> Result<ProposalStatus, GovernanceError> {
        let record = self.record(id)?;
        Ok(self.resolve(&record.proposal))
    }

    pub(crate) fn resolve(&self, proposal: &Proposal) -> ProposalStatus {
        resolve_status(
            proposal,
            self.clock.now(),
            &self.params,
            self.oracle.total_supply(),
        )
    }

    pub(crate) fn record(&self, id: ProposalId) -> Result<&ProposalRecord, GovernanceError> {
        self.registry.get(&id).ok_or(GovernanceError::NotFound(id))
    }
}
