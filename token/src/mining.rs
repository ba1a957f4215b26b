//! The mining contract: the governance engine's privileged target.
//!
//! Difficulty and reward change only through [`TargetContract::apply_change`]
//! and only when the caller is the recorded owner. At deployment the owner
//! is whoever deployed it; ownership must be handed to the governance
//! engine before any proposal can execute.

use blan_governance::{ProposalPayload, TargetContract, TargetError, TargetParam};
use blan_types::{format_tokens, Address};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

use crate::error::TokenError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningSnapshot {
    pub owner: Address,
    pub difficulty: u128,
    pub reward: u128,
}

#[derive(Debug)]
pub struct MiningContract {
    state: Mutex<MiningSnapshot>,
}

impl MiningContract {
    pub fn new(owner: Address, difficulty: u128, reward: u128) -> Result<Self, TokenError> {
        Self::from_snapshot(MiningSnapshot {
            owner,
            difficulty,
            reward,
        })
    }

    pub fn from_snapshot(snapshot: MiningSnapshot) -> Result<Self, TokenError> {
        if snapshot.difficulty == 0 {
            return Err(TokenError::ZeroDifficulty);
        }
        Ok(Self {
            state: Mutex::new(snapshot),
        })
    }

    pub fn snapshot(&self) -> MiningSnapshot {
        self.lock().clone()
    }

    pub fn owner(&self) -> Address {
        self.lock().owner
    }

    pub fn difficulty(&self) -> u128 {
        self.lock().difficulty
    }

    pub fn reward(&self) -> u128 {
        self.lock().reward
    }

    /// Hand control to `new_owner`. Only the current owner may call this.
    pub fn transfer_ownership(&self, caller: &Address, new_owner: Address) -> Result<(), TokenError> {
        let mut state = self.lock();
        if *caller != state.owner {
            return Err(TokenError::NotOwner { caller: *caller });
        }
        info!(from = %state.owner, to = %new_owner, "mining contract ownership transferred");
        state.owner = new_owner;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, MiningSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TargetContract for MiningContract {
    fn apply_change(&self, caller: &Address, payload: &ProposalPayload) -> Result<(), TargetError> {
        let mut state = self.lock();
        if *caller != state.owner {
            return Err(TargetError::Unauthorized { caller: *caller });
        }
        match payload.param {
            TargetParam::MiningDifficulty => {
                if payload.new_value == 0 {
                    return Err(TargetError::Rejected(TokenError::ZeroDifficulty.to_string()));
                }
                info!(old = state.difficulty, new = payload.new_value, "mining difficulty changed");
                state.difficulty = payload.new_value;
            }
            TargetParam::MiningReward => {
                info!(
                    old = %format_tokens(state.reward),
                    new = %format_tokens(payload.new_value),
                    "mining reward changed"
                );
                state.reward = payload.new_value;
            }
        }
        Ok(())
    }
}
