//! Events emitted at each committed state change.

use blan_types::{Address, Timestamp};

use crate::ledger::Support;
use crate::proposal::{ProposalId, ProposalPayload, ProposalStatus};

/// Governance events that observers (indexers, tests) can subscribe to.
///
/// Emitted strictly after the state they describe has been committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        payload: ProposalPayload,
        description: String,
        voting_starts: Timestamp,
        voting_ends: Timestamp,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: Support,
        weight: u128,
    },
    ProposalFinalized {
        id: ProposalId,
        outcome: ProposalStatus,
        for_votes: u128,
        against_votes: u128,
        abstain_votes: u128,
        quorum: u128,
    },
    ProposalExecuted {
        id: ProposalId,
        payload: ProposalPayload,
    },
    ProposalExpired {
        id: ProposalId,
        deadline: Timestamp,
    },
    ProposalCanceled {
        id: ProposalId,
    },
}

impl GovernanceEvent {
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::ProposalCreated { id, .. }
            | Self::VoteCast { id, .. }
            | Self::ProposalFinalized { id, .. }
            | Self::ProposalExecuted { id, .. }
            | Self::ProposalExpired { id, .. }
            | Self::ProposalCanceled { id } => *id,
        }
    }
}

pub type Listener = Box<dyn Fn(&GovernanceEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
