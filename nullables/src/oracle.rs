//! Nullable balance oracle: balances set directly by the test.

use blan_governance::BalanceOracle;
use blan_types::Address;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory balance table.
///
/// Total supply is the sum of all balances unless pinned with
/// [`NullOracle::set_total_supply`].
#[derive(Default)]
pub struct NullOracle {
    balances: Mutex<HashMap<Address, u128>>,
    pinned_supply: Mutex<Option<u128>>,
}

impl NullOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(entries: impl IntoIterator<Item = (Address, u128)>) -> Self {
        let oracle = Self::new();
        for (account, balance) in entries {
            oracle.set_balance(account, balance);
        }
        oracle
    }

    pub fn set_balance(&self, account: Address, balance: u128) {
        self.balances.lock().unwrap().insert(account, balance);
    }

    pub fn set_total_supply(&self, supply: u128) {
        *self.pinned_supply.lock().unwrap() = Some(supply);
    }
}

impl BalanceOracle for NullOracle {
    fn balance_of(&self, account: &Address) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        if let Some(pinned) = *self.pinned_supply.lock().unwrap() {
            return pinned;
        }
        self.balances
            .lock()
            .unwrap()
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b))
    }
}
