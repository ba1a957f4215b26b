//! Registry persistence.
//!
//! Proposals are archival: a saved registry carries every proposal ever
//! created together with its vote ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::engine::{GovernanceEngine, ProposalRecord};
use crate::error::GovernanceError;
use crate::ledger::Support;
use crate::proposal::{ProposalId, ProposalStatus};

/// Serializable snapshot of the registry.
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot {
    next_id: ProposalId,
    records: Vec<ProposalRecord>,
}

impl GovernanceEngine {
    /// Serialize the registry to bytes.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        let snapshot = RegistrySnapshot {
            next_id: self.next_id,
            records: self.registry.values().cloned().collect(),
        };
        bincode::serialize(&snapshot).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }

    /// Replace the registry with a previously saved one.
    ///
    /// The snapshot is checked before anything is replaced: ids must be
    /// unique and below `next_id`, each proposal's tallies must equal the
    /// weight recorded in its ledger, and the stored status must agree with
    /// the `executed` flag and the timelock start.
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), GovernanceError> {
        let snapshot: RegistrySnapshot = bincode::deserialize(data)
            .map_err(|e| GovernanceError::Serialization(e.to_string()))?;

        let mut registry = BTreeMap::new();
        for record in snapshot.records {
            let id = record.proposal.id;
            if id >= snapshot.next_id {
                return Err(GovernanceError::Serialization(format!(
                    "proposal {id} is not below next id {}",
                    snapshot.next_id
                )));
            }
            let executed_status = record.proposal.status == ProposalStatus::Executed;
            if record.proposal.executed != executed_status {
                return Err(GovernanceError::Serialization(format!(
                    "proposal {id} executed flag disagrees with status {}",
                    record.proposal.status
                )));
            }
            if record.proposal.status == ProposalStatus::Succeeded
                && record.proposal.queued_at.is_none()
            {
                return Err(GovernanceError::Serialization(format!(
                    "proposal {id} succeeded without a timelock start"
                )));
            }
            for support in [Support::Against, Support::For, Support::Abstain] {
                let recorded = record
                    .ledger
                    .weight_for(support)
                    .ok_or(GovernanceError::Overflow)?;
                if recorded != record.proposal.tally(support) {
                    return Err(GovernanceError::Serialization(format!(
                        "proposal {id} {} tally does not match its ledger",
                        support.as_str()
                    )));
                }
            }
            if registry.insert(id, record).is_some() {
                return Err(GovernanceError::Serialization(format!(
                    "duplicate proposal {id}"
                )));
            }
        }

        info!(proposals = registry.len(), next_id = snapshot.next_id, "registry restored");
        self.registry = registry;
        self.next_id = snapshot.next_id;
        Ok(())
    }
}
