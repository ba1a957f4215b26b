//! Devnet genesis file.
//!
//! ```toml
//! start_time = 1700000000
//! deployer = "deployer"
//!
//! [mining]
//! difficulty = 1000
//! reward = "50000000000000000000"
//!
//! [[allocations]]
//! account = "alice"
//! tokens = 20000
//! ```

use anyhow::{ensure, Context, Result};
use blan_types::{tokens, Address};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::account::parse_account;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// `0x` address or label.
    pub account: String,
    /// Whole tokens.
    pub tokens: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningGenesis {
    #[serde(default = "default_difficulty", with = "blan_types::amount::decimal")]
    pub difficulty: u128,

    /// Raw units per block.
    #[serde(default = "default_reward", with = "blan_types::amount::decimal")]
    pub reward: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Devnet clock at genesis (Unix seconds). Defaults to the wall clock.
    #[serde(default)]
    pub start_time: Option<u64>,

    /// Initial owner of the mining contract.
    #[serde(default = "default_deployer")]
    pub deployer: String,

    /// Hand mining contract ownership to the governance engine at genesis.
    #[serde(default = "default_hand_over")]
    pub hand_over: bool,

    #[serde(default)]
    pub mining: MiningGenesis,

    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

fn default_difficulty() -> u128 {
    1_000
}

fn default_reward() -> u128 {
    tokens(50)
}

fn default_deployer() -> String {
    "deployer".into()
}

fn default_hand_over() -> bool {
    true
}

impl Default for MiningGenesis {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            reward: default_reward(),
        }
    }
}

impl GenesisConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading genesis file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        ensure!(!config.allocations.is_empty(), "genesis has no allocations");
        Ok(config)
    }

    /// Allocations resolved to addresses and raw amounts.
    pub fn resolved_allocations(&self) -> Result<Vec<(Address, u128)>> {
        self.allocations
            .iter()
            .map(|a| {
                let account = parse_account(&a.account)
                    .with_context(|| format!("allocation account '{}'", a.account))?;
                Ok((account, tokens(u128::from(a.tokens))))
            })
            .collect()
    }

    pub fn deployer_address(&self) -> Result<Address> {
        parse_account(&self.deployer).context("genesis deployer")
    }
}
