//! Execution gate: the only path to the target contract's privileged call.
//!
//! Ordering is commit-then-call. `executed` and `Executed` are written
//! before the target is invoked, so nothing the target does can observe a
//! queued proposal. If the target refuses, the prior state is restored and
//! the call fails as a whole.

use tracing::{info, warn};

use crate::engine::{log_rejection, GovernanceEngine};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::interfaces::TargetError;
use crate::proposal::{ProposalId, ProposalStatus};
use crate::spans;
use crate::status::resolve_status;

impl GovernanceEngine {
    /// Apply a queued proposal's change to the target, exactly once.
    ///
    /// Detecting a lapsed window commits `Expired` and still returns
    /// [`GovernanceError::WindowExpired`].
    pub fn execute_proposal(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        let _span = spans::execute_span(id).entered();
        self.try_execute(id).inspect_err(log_rejection)
    }

    fn try_execute(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        let now = self.clock.now();
        let supply = self.oracle.total_supply();
        let record = self
            .registry
            .get_mut(&id)
            .ok_or(GovernanceError::NotFound(id))?;
        let proposal = &mut record.proposal;

        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }

        let status = resolve_status(proposal, now, &self.params, supply);
        let (eta, deadline) = match (
            status,
            proposal.execution_eta(&self.params),
            proposal.execution_deadline(&self.params),
        ) {
            (ProposalStatus::Queued, Some(eta), Some(deadline)) => (eta, deadline),
            (ProposalStatus::Expired, _, Some(deadline))
                if proposal.status == ProposalStatus::Succeeded =>
            {
                proposal.status = ProposalStatus::Expired;
                warn!(proposal = id, deadline = %deadline, "execution window lapsed");
                self.events
                    .emit(&GovernanceEvent::ProposalExpired { id, deadline });
                return Err(GovernanceError::WindowExpired { id, deadline });
            }
            (status, _, _) => return Err(GovernanceError::WrongStatus { id, status }),
        };
        if now < eta {
            return Err(GovernanceError::TimelockNotElapsed { id, eta });
        }
        debug_assert!(now <= deadline);

        let prior_status = proposal.status;
        proposal.executed = true;
        proposal.status = ProposalStatus::Executed;
        let payload = proposal.payload.clone();

        if let Err(refusal) = self.target.apply_change(&self.address, &payload) {
            proposal.executed = false;
            proposal.status = prior_status;
            warn!(proposal = id, error = %refusal, "target refused change");
            return Err(match refusal {
                TargetError::Unauthorized { caller } => GovernanceError::Unauthorized(caller),
                TargetError::Rejected(reason) => GovernanceError::ExecutionFailed(reason),
            });
        }

        info!(proposal = id, payload = %payload, "proposal executed");
        self.events
            .emit(&GovernanceEvent::ProposalExecuted { id, payload });
        Ok(())
    }
}
