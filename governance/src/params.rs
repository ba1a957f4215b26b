//! Fixed durations and thresholds that drive every proposal.
//!
//! Loaded from TOML (every field optional) or built programmatically.
//! The engine validates a parameter set once, at construction.

use blan_types::tokens;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GovernanceError;

/// Basis-point scale: 10_000 = 100%.
pub const BPS_SCALE: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Seconds between creation and the start of voting.
    #[serde(default = "default_voting_delay")]
    pub voting_delay_secs: u64,

    /// Length of the voting window in seconds.
    #[serde(default = "default_voting_period")]
    pub voting_period_secs: u64,

    /// Timelock between a successful finalize and the earliest execution.
    #[serde(default = "default_execution_delay")]
    pub execution_delay_secs: u64,

    /// How long after the timelock a queued proposal stays executable.
    #[serde(default = "default_execution_window")]
    pub execution_window_secs: u64,

    /// Minimum balance (raw units) a proposer must hold.
    #[serde(default = "default_proposal_threshold", with = "blan_types::amount::decimal")]
    pub proposal_threshold: u128,

    /// Required participation as a fraction of total supply (basis points).
    #[serde(default = "default_quorum_bps")]
    pub quorum_bps: u32,

    /// Maximum description length in bytes.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_delay() -> u64 {
    24 * 3600
}

fn default_voting_period() -> u64 {
    7 * 24 * 3600
}

fn default_execution_delay() -> u64 {
    2 * 24 * 3600
}

fn default_execution_window() -> u64 {
    14 * 24 * 3600
}

fn default_proposal_threshold() -> u128 {
    tokens(10_000)
}

fn default_quorum_bps() -> u32 {
    400
}

fn default_max_description_len() -> usize {
    4096
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceParams {
    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GovernanceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let params: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize the parameters to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Reject parameter sets that would break the phase ordering.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_delay_secs == 0 {
            return Err(GovernanceError::Config(
                "voting_delay_secs must be greater than zero".into(),
            ));
        }
        if self.voting_period_secs == 0 {
            return Err(GovernanceError::Config(
                "voting_period_secs must be greater than zero".into(),
            ));
        }
        let lifecycle = self
            .voting_delay_secs
            .checked_add(self.voting_period_secs)
            .and_then(|t| t.checked_add(self.execution_delay_secs))
            .and_then(|t| t.checked_add(self.execution_window_secs));
        if lifecycle.is_none() {
            return Err(GovernanceError::Config(
                "voting, timelock and execution durations overflow u64 seconds".into(),
            ));
        }
        if self.quorum_bps > BPS_SCALE {
            return Err(GovernanceError::Config(format!(
                "quorum_bps {} exceeds {}",
                self.quorum_bps, BPS_SCALE
            )));
        }
        Ok(())
    }

    /// Participating weight required for quorum at the given total supply.
    ///
    /// `ceil(total_supply * quorum_bps / 10_000)`, computed without
    /// overflowing for any `u128` supply.
    pub fn quorum(&self, total_supply: u128) -> u128 {
        let scale = u128::from(BPS_SCALE);
        let bps = u128::from(self.quorum_bps);
        let whole = (total_supply / scale) * bps;
        let rem = (total_supply % scale) * bps;
        whole.saturating_add(rem.div_ceil(scale))
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            voting_delay_secs: default_voting_delay(),
            voting_period_secs: default_voting_period(),
            execution_delay_secs: default_execution_delay(),
            execution_window_secs: default_execution_window(),
            proposal_threshold: default_proposal_threshold(),
            quorum_bps: default_quorum_bps(),
            max_description_len: default_max_description_len(),
        }
    }
}
