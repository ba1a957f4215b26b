//! End-to-end proposal lifecycle against the token ledger and mining contract.

mod common;

use std::sync::{Arc, Mutex};

use blan_governance::{GovernanceError, GovernanceEvent, ProposalStatus, Support};
use blan_types::{tokens, Address, Timestamp};
use common::*;

#[test]
fn proposer_above_threshold_gets_id_zero() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "Raise difficulty by 10%")
        .unwrap();
    assert_eq!(id, 0);
    assert_eq!(net.engine.proposal_count(), 1);
    assert_eq!(net.engine.state(0).unwrap(), ProposalStatus::Pending);

    let p = net.engine.get_proposal(0).unwrap();
    assert_eq!(p.proposer, proposer());
    assert_eq!(p.voting_starts, Timestamp::new(GENESIS_TIME + 86_400));
    assert_eq!(p.voting_ends, Timestamp::new(GENESIS_TIME + 86_400 + 604_800));
}

#[test]
fn proposer_below_threshold_rejected() {
    let mut net = Devnet::new();
    let err = net
        .engine
        .propose_difficulty_change(&minnow(), 1_100, "too small")
        .unwrap_err();
    assert_eq!(
        err,
        GovernanceError::InsufficientWeight {
            have: tokens(5_000),
            need: tokens(10_000)
        }
    );
    assert_eq!(net.engine.proposal_count(), 0);
}

#[test]
fn zero_difficulty_proposal_rejected() {
    let mut net = Devnet::new();
    assert!(matches!(
        net.engine.propose_difficulty_change(&proposer(), 0, "halt"),
        Err(GovernanceError::InvalidPayload(_))
    ));
}

#[test]
fn vote_recorded_once() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();

    assert!(matches!(
        net.engine.cast_vote(id, &minnow(), 1u8),
        Err(GovernanceError::NotActive {
            status: ProposalStatus::Pending,
            ..
        })
    ));

    net.open_voting(id);
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Active);
    net.engine.cast_vote(id, &minnow(), 1u8).unwrap();

    let vote = net.engine.get_vote(id, &minnow()).unwrap();
    assert!(vote.has_voted);
    assert_eq!(u8::from(vote.support), 1);
    assert_eq!(vote.weight, tokens(5_000));

    assert_eq!(
        net.engine.cast_vote(id, &minnow(), 1u8),
        Err(GovernanceError::AlreadyVoted {
            id,
            voter: minnow()
        })
    );
    assert_eq!(net.engine.get_proposal(id).unwrap().for_votes, tokens(5_000));
}

#[test]
fn unknown_voter_and_bad_support_rejected() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    net.open_voting(id);

    let stranger = Address::derive("stranger");
    assert_eq!(
        net.engine.cast_vote(id, &stranger, Support::For),
        Err(GovernanceError::ZeroWeight(stranger))
    );
    assert_eq!(
        net.engine.cast_vote(id, &whale(), 3u8),
        Err(GovernanceError::InvalidSupport(3))
    );
    assert!(!net.engine.has_voted(id, &stranger).unwrap());
    assert!(!net.engine.has_voted(id, &whale()).unwrap());
    assert_eq!(
        net.engine.cast_vote(42, &whale(), 1u8),
        Err(GovernanceError::NotFound(42))
    );
}

#[test]
fn succeeded_proposal_executes_after_timelock() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    net.open_voting(id);
    net.engine.cast_vote(id, &whale(), 1u8).unwrap();

    assert!(matches!(
        net.engine.finalize_proposal(id),
        Err(GovernanceError::VotingNotEnded { .. })
    ));

    net.close_voting(id);
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Succeeded);
    assert_eq!(
        net.engine.finalize_proposal(id).unwrap(),
        ProposalStatus::Succeeded
    );
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Queued);
    assert_eq!(
        net.engine.finalize_proposal(id),
        Err(GovernanceError::AlreadyFinalized(id))
    );

    let queued_at = net.engine.get_proposal(id).unwrap().queued_at.unwrap();
    let eta = queued_at.plus(net.params().execution_delay_secs);
    assert_eq!(
        net.engine.execute_proposal(id),
        Err(GovernanceError::TimelockNotElapsed { id, eta })
    );
    assert_eq!(net.mining.difficulty(), INITIAL_DIFFICULTY);

    net.clock.set(eta.as_secs());
    net.engine.execute_proposal(id).unwrap();
    assert!(net.engine.get_proposal(id).unwrap().executed);
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Executed);
    assert_eq!(net.mining.difficulty(), 1_100);

    assert_eq!(
        net.engine.execute_proposal(id),
        Err(GovernanceError::AlreadyExecuted(id))
    );
}

#[test]
fn defeated_without_quorum() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    net.open_voting(id);
    // 25,000 of a 40,000 quorum.
    net.engine.cast_vote(id, &proposer(), Support::For).unwrap();
    net.engine.cast_vote(id, &minnow(), Support::Abstain).unwrap();
    net.close_voting(id);

    let outcome = net.engine.outcome(id).unwrap();
    assert_eq!(outcome.quorum, tokens(40_000));
    assert!(!outcome.quorum_met);
    assert_eq!(
        net.engine.finalize_proposal(id).unwrap(),
        ProposalStatus::Defeated
    );
    assert!(matches!(
        net.engine.execute_proposal(id),
        Err(GovernanceError::WrongStatus {
            status: ProposalStatus::Defeated,
            ..
        })
    ));
}

#[test]
fn defeated_on_tie() {
    let mut net = Devnet::new();
    net.token
        .transfer(&treasury(), &minnow(), tokens(295_000))
        .unwrap();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    net.open_voting(id);
    net.engine.cast_vote(id, &whale(), Support::For).unwrap();
    net.engine.cast_vote(id, &minnow(), Support::Against).unwrap();
    net.close_voting(id);
    assert_eq!(
        net.engine.finalize_proposal(id).unwrap(),
        ProposalStatus::Defeated
    );
}

#[test]
fn execute_after_window_expires() {
    let mut net = Devnet::new();
    let id = net.queued_proposal(1_100);
    let params = net.params();
    let queued_at = net.engine.get_proposal(id).unwrap().queued_at.unwrap();
    let deadline = queued_at
        .plus(params.execution_delay_secs)
        .plus(params.execution_window_secs);

    net.clock.set(deadline.as_secs() + 1);
    assert_eq!(
        net.engine.execute_proposal(id),
        Err(GovernanceError::WindowExpired { id, deadline })
    );
    assert_eq!(net.engine.get_proposal(id).unwrap().status, ProposalStatus::Expired);
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Expired);
    assert_eq!(
        net.engine.execute_proposal(id),
        Err(GovernanceError::WrongStatus {
            id,
            status: ProposalStatus::Expired
        })
    );
    assert_eq!(net.mining.difficulty(), INITIAL_DIFFICULTY);
}

#[test]
fn execute_on_last_second_of_window() {
    let mut net = Devnet::new();
    let id = net.queued_proposal(1_200);
    let deadline = net
        .engine
        .get_proposal(id)
        .unwrap()
        .execution_deadline(&net.params())
        .unwrap();
    net.clock.set(deadline.as_secs());
    net.engine.execute_proposal(id).unwrap();
    assert_eq!(net.mining.difficulty(), 1_200);
}

#[test]
fn lapsed_window_reads_expired_without_any_call() {
    let mut net = Devnet::new();
    let id = net.queued_proposal(1_100);
    net.clock.advance(30 * 86_400);
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Expired);
    assert_eq!(net.engine.proposals_in_state(ProposalStatus::Expired), vec![id]);
    // Committed field still says Succeeded until someone touches it.
    assert_eq!(net.engine.get_proposal(id).unwrap().status, ProposalStatus::Succeeded);
}

#[test]
fn ended_but_unfinalized_cannot_be_voted_on() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    net.close_voting(id);
    assert!(matches!(
        net.engine.cast_vote(id, &whale(), 1u8),
        Err(GovernanceError::NotActive { .. })
    ));
}

#[test]
fn weight_is_read_at_cast_time() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    net.open_voting(id);

    net.engine.cast_vote(id, &minnow(), Support::For).unwrap();
    // Balance moves after voting; the recorded weight does not.
    net.token
        .transfer(&minnow(), &proposer(), tokens(5_000))
        .unwrap();
    assert_eq!(net.engine.get_vote(id, &minnow()).unwrap().weight, tokens(5_000));

    net.engine.cast_vote(id, &proposer(), Support::For).unwrap();
    assert_eq!(
        net.engine.get_vote(id, &proposer()).unwrap().weight,
        tokens(25_000)
    );
    assert_eq!(net.engine.get_proposal(id).unwrap().for_votes, tokens(30_000));
}

#[test]
fn proposer_cancels_before_finalization() {
    let mut net = Devnet::new();
    let id = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "")
        .unwrap();
    assert_eq!(
        net.engine.cancel_proposal(id, &whale()),
        Err(GovernanceError::NotProposer(id))
    );
    net.engine.cancel_proposal(id, &proposer()).unwrap();
    assert_eq!(net.engine.state(id).unwrap(), ProposalStatus::Canceled);

    net.open_voting(id);
    assert!(matches!(
        net.engine.cast_vote(id, &whale(), 1u8),
        Err(GovernanceError::NotActive {
            status: ProposalStatus::Canceled,
            ..
        })
    ));
    net.close_voting(id);
    assert_eq!(
        net.engine.finalize_proposal(id),
        Err(GovernanceError::AlreadyFinalized(id))
    );
}

#[test]
fn events_follow_lifecycle() {
    let mut net = Devnet::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    net.engine.subscribe(Box::new(move |e: &GovernanceEvent| {
        sink.lock().unwrap().push(e.clone())
    }));

    let id = net.queued_proposal(1_100);
    let eta = net
        .engine
        .get_proposal(id)
        .unwrap()
        .execution_eta(&net.params())
        .unwrap();
    net.clock.set(eta.as_secs());
    net.engine.execute_proposal(id).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(matches!(seen[0], GovernanceEvent::ProposalCreated { id: 0, .. }));
    assert!(matches!(
        seen[1],
        GovernanceEvent::VoteCast {
            support: Support::For,
            ..
        }
    ));
    assert!(matches!(
        seen[2],
        GovernanceEvent::ProposalFinalized {
            outcome: ProposalStatus::Succeeded,
            ..
        }
    ));
    assert!(matches!(seen[3], GovernanceEvent::ProposalExecuted { .. }));
    assert!(seen.iter().all(|e| e.proposal_id() == id));
}

#[test]
fn proposals_are_archival() {
    let mut net = Devnet::new();
    let a = net
        .engine
        .propose_difficulty_change(&proposer(), 1_100, "a")
        .unwrap();
    let b = net
        .engine
        .propose_difficulty_change(&proposer(), 1_200, "b")
        .unwrap();
    net.engine.cancel_proposal(a, &proposer()).unwrap();
    net.clock.advance(365 * 86_400);

    let ids: Vec<_> = net.engine.proposals().map(|p| p.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(net.engine.state(b).unwrap(), ProposalStatus::Defeated);
}
