//! Token balances.
//!
//! Supply is fixed at genesis. Transfers move balance between accounts and
//! never create or destroy it, so the sum of balances always equals
//! `total_supply`.

use blan_governance::BalanceOracle;
use blan_types::{format_tokens, Address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::error::TokenError;

/// Serializable ledger contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub balances: BTreeMap<Address, u128>,
    pub total_supply: u128,
}

impl TokenSnapshot {
    fn checked_sum(&self) -> Result<u128, TokenError> {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or(TokenError::Overflow)
    }
}

/// Shared token ledger.
///
/// Reads and writes go through an internal lock so the ledger can be
/// handed to the governance engine as an `Arc<dyn BalanceOracle>` while
/// holders keep transferring.
#[derive(Debug, Default)]
pub struct TokenLedger {
    state: RwLock<TokenSnapshot>,
}

impl TokenLedger {
    /// Mint the entire supply to the given accounts.
    ///
    /// Repeated accounts accumulate.
    pub fn genesis(
        allocations: impl IntoIterator<Item = (Address, u128)>,
    ) -> Result<Self, TokenError> {
        let mut snapshot = TokenSnapshot::default();
        for (account, amount) in allocations {
            if account.is_zero() {
                return Err(TokenError::ZeroAddress);
            }
            let slot = snapshot.balances.entry(account).or_insert(0);
            *slot = slot.checked_add(amount).ok_or(TokenError::Overflow)?;
            snapshot.total_supply = snapshot
                .total_supply
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
        }
        snapshot.balances.retain(|_, b| *b > 0);
        info!(
            holders = snapshot.balances.len(),
            supply = %format_tokens(snapshot.total_supply),
            "token genesis"
        );
        Ok(Self {
            state: RwLock::new(snapshot),
        })
    }

    /// Restore a ledger, rejecting contents whose balances do not add up.
    pub fn from_snapshot(snapshot: TokenSnapshot) -> Result<Self, TokenError> {
        let sum = snapshot.checked_sum()?;
        if sum != snapshot.total_supply {
            return Err(TokenError::SupplyMismatch {
                sum,
                supply: snapshot.total_supply,
            });
        }
        Ok(Self {
            state: RwLock::new(snapshot),
        })
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        self.read().clone()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.read().balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.read().total_supply
    }

    /// Number of accounts with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.read().balances.len()
    }

    pub fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let mut state = self.write();
        let available = state.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = state
            .balances
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        let remaining = available - amount;
        if remaining == 0 {
            state.balances.remove(from);
        } else {
            state.balances.insert(*from, remaining);
        }
        state.balances.insert(*to, credited);
        debug!(%from, %to, amount = %format_tokens(amount), "transfer");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, TokenSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TokenSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BalanceOracle for TokenLedger {
    fn balance_of(&self, account: &Address) -> u128 {
        TokenLedger::balance_of(self, account)
    }

    fn total_supply(&self) -> u128 {
        TokenLedger::total_supply(self)
    }
}
