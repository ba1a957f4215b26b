//! Token and mining contract errors.

use blan_types::Address;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in token accounting")]
    Overflow,

    #[error("{caller} is not the owner of this contract")]
    NotOwner { caller: Address },

    #[error("mining difficulty must be non-zero")]
    ZeroDifficulty,

    #[error("genesis allocates to the zero address")]
    ZeroAddress,

    #[error("balances sum to {sum}, recorded supply is {supply}")]
    SupplyMismatch { sum: u128, supply: u128 },
}
