//! Account address type with `0x` hex display.

use blake2::digest::consts::U20;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BlanError;

type Blake2b160 = Blake2b<U20>;

/// A 20-byte account identifier.
///
/// Token holders, the governance engine and the mining contract owner are
/// all identified by an `Address`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The standard display prefix.
    pub const PREFIX: &'static str = "0x";

    /// The all-zero address. Never a valid holder.
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic address from an arbitrary label.
    ///
    /// Blake2b-160 of the label bytes. Used for well-known identities
    /// (the governance engine, devnet accounts) and in tests.
    pub fn derive(label: &str) -> Self {
        let mut hasher = Blake2b160::new();
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}{})", Self::PREFIX, hex::encode(&self.0[..4]))
    }
}

impl FromStr for Address {
    type Err = BlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(Self::PREFIX).unwrap_or(s);
        let raw = hex::decode(digits).map_err(|_| BlanError::InvalidAddress(s.to_string()))?;
        let bytes: [u8; 20] = raw
            .try_into()
            .map_err(|_| BlanError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}
