//! Library side of `blan-gov`, the local governance devnet tool.
//!
//! A devnet is a token ledger, a mining contract, a governance engine and
//! a simulated clock saved together in one state file. Every command loads
//! the file, runs one engine operation and writes it back.

pub mod account;
pub mod commands;
pub mod config;
pub mod devnet;
pub mod genesis;

pub use commands::{init, run, Command};
pub use config::{resolve_params, ParamOverrides};
pub use devnet::Devnet;
pub use genesis::GenesisConfig;
