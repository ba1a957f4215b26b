//! Nullable target contract: records every change it is asked to apply.

use blan_governance::{ProposalPayload, TargetContract, TargetError};
use blan_types::Address;
use std::sync::Mutex;

/// A target that accepts changes from a single owner and logs them.
pub struct NullTarget {
    owner: Address,
    applied: Mutex<Vec<(Address, ProposalPayload)>>,
    failure: Mutex<Option<String>>,
}

impl NullTarget {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            applied: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(reason.into());
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Changes applied so far, in call order.
    pub fn applied(&self) -> Vec<(Address, ProposalPayload)> {
        self.applied.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }
}

impl TargetContract for NullTarget {
    fn apply_change(&self, caller: &Address, payload: &ProposalPayload) -> Result<(), TargetError> {
        if *caller != self.owner {
            return Err(TargetError::Unauthorized { caller: *caller });
        }
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(TargetError::Rejected(reason));
        }
        self.applied.lock().unwrap().push((*caller, payload.clone()));
        Ok(())
    }
}
