//! In-crate collaborators for unit tests.

use blan_types::{Address, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::GovernanceEngine;
use crate::interfaces::{BalanceOracle, Clock, TargetContract, TargetError};
use crate::params::GovernanceParams;
use crate::proposal::ProposalPayload;

pub(crate) struct TestClock(pub(crate) AtomicU64);

impl TestClock {
    pub(crate) fn set(&self, secs: u64) {
        self.0.store(secs, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.0.load(Ordering::SeqCst))
    }
}

pub(crate) struct TestOracle(pub(crate) Mutex<HashMap<Address, u128>>);

impl BalanceOracle for TestOracle {
    fn balance_of(&self, account: &Address) -> u128 {
        self.0.lock().unwrap().get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.0.lock().unwrap().values().sum()
    }
}

pub(crate) struct AcceptAll;

impl TargetContract for AcceptAll {
    fn apply_change(&self, _: &Address, _: &ProposalPayload) -> Result<(), TargetError> {
        Ok(())
    }
}

/// Delay 10, period 100, timelock 20, window 50, threshold 50, quorum 10%.
pub(crate) fn params() -> GovernanceParams {
    GovernanceParams {
        voting_delay_secs: 10,
        voting_period_secs: 100,
        execution_delay_secs: 20,
        execution_window_secs: 50,
        proposal_threshold: 50,
        quorum_bps: 1000,
        max_description_len: 16,
    }
}

/// Engine at t=1000 with alice 100, bob 400, carol 500.
pub(crate) fn setup() -> (GovernanceEngine, Arc<TestClock>, Arc<TestOracle>) {
    let clock = Arc::new(TestClock(AtomicU64::new(1_000)));
    let oracle = Arc::new(TestOracle(Mutex::new(HashMap::from([
        (Address::derive("alice"), 100),
        (Address::derive("bob"), 400),
        (Address::derive("carol"), 500),
    ]))));
    let engine = GovernanceEngine::new(
        Address::derive("governance"),
        params(),
        clock.clone(),
        oracle.clone(),
        Arc::new(AcceptAll),
    )
    .unwrap();
    (engine, clock, oracle)
}
