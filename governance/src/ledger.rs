//! Per-proposal vote ledger.
//!
//! One ledger partition exists per proposal id and is owned by the registry
//! next to the proposal it belongs to. A voter appears at most once; a
//! record, once written, is never modified or removed.

use blan_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GovernanceError;

/// Vote direction. The discriminants are the wire values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Support {
    #[default]
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl Support {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Against => "against",
            Self::For => "for",
            Self::Abstain => "abstain",
        }
    }
}

impl TryFrom<u8> for Support {
    type Error = GovernanceError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            other => Err(GovernanceError::InvalidSupport(other)),
        }
    }
}

impl From<Support> for u8 {
    fn from(support: Support) -> Self {
        support as u8
    }
}

/// A single voter's record on one proposal.
///
/// The default value (`has_voted == false`) is what queries return for an
/// account that has not voted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub has_voted: bool,
    pub support: Support,
    /// Balance read from the oracle at the moment of casting.
    pub weight: u128,
    pub cast_at: Timestamp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteLedger {
    records: HashMap<Address, VoteRecord>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.records.contains_key(voter)
    }

    pub fn get(&self, voter: &Address) -> Option<&VoteRecord> {
        self.records.get(voter)
    }

    /// Insert a vote. Returns `None` if the voter already has a record.
    pub(crate) fn record(
        &mut self,
        voter: Address,
        support: Support,
        weight: u128,
        now: Timestamp,
    ) -> Option<VoteRecord> {
        if self.records.contains_key(&voter) {
            return None;
        }
        let record = VoteRecord {
            has_voted: true,
            support,
            weight,
            cast_at: now,
        };
        self.records.insert(voter, record);
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by voter address.
    pub fn sorted(&self) -> Vec<(Address, VoteRecord)> {
        let mut out: Vec<_> = self.records.iter().map(|(a, r)| (*a, *r)).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Sum of recorded weight for one side, `None` on overflow.
    pub fn weight_for(&self, support: Support) -> Option<u128> {
        self.records
            .values()
            .filter(|r| r.support == support)
            .try_fold(0u128, |acc, r| acc.checked_add(r.weight))
    }
}
