//! Notifications for lapse, cancellation, and rejected votes.

use std::sync::{Arc, Mutex};

use blan_governance::{
    GovernanceEngine, GovernanceError, GovernanceEvent, GovernanceParams, ProposalStatus, Support,
};
use blan_nullables::{NullClock, NullOracle, NullTarget};
use blan_types::Address;

fn params() -> GovernanceParams {
    GovernanceParams {
        voting_delay_secs: 1,
        voting_period_secs: 10,
        execution_delay_secs: 5,
        execution_window_secs: 5,
        proposal_threshold: 1,
        quorum_bps: 5_000,
        max_description_len: 64,
    }
}

fn a() -> Address {
    Address::derive("a")
}

fn b() -> Address {
    Address::derive("b")
}

/// Engine at t=0 whose events are collected into the returned sink.
fn watched(
    balances: [(Address, u128); 2],
) -> (Arc<NullClock>, GovernanceEngine, Arc<Mutex<Vec<GovernanceEvent>>>) {
    let clock = Arc::new(NullClock::new(0));
    let gov = Address::derive("gov");
    let mut engine = GovernanceEngine::new(
        gov,
        params(),
        clock.clone(),
        Arc::new(NullOracle::with_balances(balances)),
        Arc::new(NullTarget::new(gov)),
    )
    .unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    engine.subscribe(Box::new(move |e: &GovernanceEvent| {
        sink.lock().unwrap().push(e.clone())
    }));
    (clock, engine, seen)
}

#[test]
fn lapsed_execution_announces_expiry() {
    let (clock, mut engine, seen) = watched([(a(), 100), (b(), 0)]);
    let id = engine.propose_difficulty_change(&a(), 7, "").unwrap();
    clock.set(1);
    engine.cast_vote(id, &a(), Support::For).unwrap();
    clock.set(11);
    engine.finalize_proposal(id).unwrap();

    let deadline = engine
        .get_proposal(id)
        .unwrap()
        .execution_deadline(&params())
        .unwrap();
    clock.set(deadline.as_secs() + 1);
    assert_eq!(
        engine.execute_proposal(id),
        Err(GovernanceError::WindowExpired { id, deadline })
    );
    assert_eq!(engine.get_proposal(id).unwrap().status, ProposalStatus::Expired);

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.last(),
        Some(&GovernanceEvent::ProposalExpired { id, deadline })
    );
    assert!(!seen
        .iter()
        .any(|e| matches!(e, GovernanceEvent::ProposalExecuted { .. })));
}

#[test]
fn cancel_announces_cancellation() {
    let (clock, mut engine, seen) = watched([(a(), 100), (b(), 0)]);
    let id = engine.propose_difficulty_change(&a(), 7, "").unwrap();
    clock.set(5);
    engine.cancel_proposal(id, &a()).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], GovernanceEvent::ProposalCanceled { id });
}

#[test]
fn overflowing_tally_commits_nothing() {
    let whale = u128::MAX / 2 + 1;
    let (clock, mut engine, seen) = watched([(a(), whale), (b(), whale)]);
    let id = engine.propose_difficulty_change(&a(), 7, "").unwrap();
    clock.set(1);
    engine.cast_vote(id, &a(), Support::For).unwrap();

    assert_eq!(
        engine.cast_vote(id, &b(), Support::For),
        Err(GovernanceError::Overflow)
    );
    assert!(!engine.has_voted(id, &b()).unwrap());
    let p = engine.get_proposal(id).unwrap();
    assert_eq!(p.for_votes, whale);
    assert_eq!(p.against_votes, 0);
    assert_eq!(p.abstain_votes, 0);
    assert_eq!(engine.votes(id).unwrap().len(), 1);

    let seen = seen.lock().unwrap();
    let casts = seen
        .iter()
        .filter(|e| matches!(e, GovernanceEvent::VoteCast { .. }))
        .count();
    assert_eq!(casts, 1);

    // The rejected voter can still vote on another side.
    drop(seen);
    engine.cast_vote(id, &b(), Support::Against).unwrap();
    assert_eq!(engine.get_proposal(id).unwrap().against_votes, whale);
}
