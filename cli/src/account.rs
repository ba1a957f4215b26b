//! Account arguments: a `0x` address, or a label hashed into one.

use blan_types::{Address, BlanError};

/// Label under which the devnet governance engine's address is derived.
pub const GOVERNANCE_LABEL: &str = "blan-governance";

/// Parse an account argument.
///
/// Anything starting with `0x` must be a full hex address. Any other
/// string is treated as a label and mapped through [`Address::derive`],
/// so `alice` always names the same devnet account.
pub fn parse_account(s: &str) -> Result<Address, BlanError> {
    if s.starts_with(Address::PREFIX) {
        s.parse()
    } else if s.is_empty() {
        Err(BlanError::InvalidAddress("empty account".into()))
    } else {
        Ok(Address::derive(s))
    }
}

pub fn governance_address() -> Address {
    Address::derive(GOVERNANCE_LABEL)
}
