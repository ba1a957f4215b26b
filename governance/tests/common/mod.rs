#![allow(dead_code)]

use std::sync::Arc;

use blan_governance::{GovernanceEngine, GovernanceParams};
use blan_nullables::NullClock;
use blan_token::{MiningContract, TokenLedger};
use blan_types::{tokens, Address};

pub const GENESIS_TIME: u64 = 1_700_000_000;
pub const INITIAL_DIFFICULTY: u128 = 1_000;
pub const INITIAL_REWARD: u128 = 50;

pub fn governance() -> Address {
    Address::derive("blan-governance")
}

pub fn deployer() -> Address {
    Address::derive("deployer")
}

pub fn proposer() -> Address {
    Address::derive("proposer")
}

pub fn whale() -> Address {
    Address::derive("whale")
}

pub fn minnow() -> Address {
    Address::derive("minnow")
}

pub fn treasury() -> Address {
    Address::derive("treasury")
}

/// A devnet with a 1,000,000 token supply and default parameters.
pub struct Devnet {
    pub clock: Arc<NullClock>,
    pub token: Arc<TokenLedger>,
    pub mining: Arc<MiningContract>,
    pub engine: GovernanceEngine,
}

impl Devnet {
    /// Mining contract ownership already handed to the engine.
    pub fn new() -> Self {
        let net = Self::without_handover();
        net.mining
            .transfer_ownership(&deployer(), governance())
            .unwrap();
        net
    }

    /// Mining contract still owned by the deployer.
    pub fn without_handover() -> Self {
        let clock = Arc::new(NullClock::new(GENESIS_TIME));
        let token = Arc::new(
            TokenLedger::genesis([
                (proposer(), tokens(20_000)),
                (whale(), tokens(300_000)),
                (minnow(), tokens(5_000)),
                (treasury(), tokens(675_000)),
            ])
            .unwrap(),
        );
        let mining =
            Arc::new(MiningContract::new(deployer(), INITIAL_DIFFICULTY, INITIAL_REWARD).unwrap());
        let engine = GovernanceEngine::new(
            governance(),
            GovernanceParams::default(),
            clock.clone(),
            token.clone(),
            mining.clone(),
        )
        .unwrap();
        Self {
            clock,
            token,
            mining,
            engine,
        }
    }

    pub fn params(&self) -> GovernanceParams {
        self.engine.params().clone()
    }

    /// Move the clock to the first second of voting for `id`.
    pub fn open_voting(&self, id: u64) {
        let starts = self.engine.get_proposal(id).unwrap().voting_starts;
        self.clock.set(starts.as_secs());
    }

    pub fn close_voting(&self, id: u64) {
        let ends = self.engine.get_proposal(id).unwrap().voting_ends;
        self.clock.set(ends.as_secs());
    }

    /// Propose, pass with the whale, and finalize. Returns the id.
    pub fn queued_proposal(&mut self, new_difficulty: u128) -> u64 {
        let id = self
            .engine
            .propose_difficulty_change(&proposer(), new_difficulty, "raise difficulty")
            .unwrap();
        self.open_voting(id);
        self.engine.cast_vote(id, &whale(), 1u8).unwrap();
        self.close_voting(id);
        self.engine.finalize_proposal(id).unwrap();
        id
    }
}
