//! Governance parameters for `init`: TOML file as the base, flags and
//! `BLAN_*` environment variables on top.

use anyhow::{Context, Result};
use blan_governance::GovernanceParams;
use blan_types::tokens;
use clap::Args;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Default, Clone)]
pub struct ParamOverrides {
    /// Seconds between proposal creation and the start of voting.
    #[arg(long, env = "BLAN_VOTING_DELAY")]
    pub voting_delay: Option<u64>,

    /// Length of the voting window in seconds.
    #[arg(long, env = "BLAN_VOTING_PERIOD")]
    pub voting_period: Option<u64>,

    /// Timelock between finalize and execute, in seconds.
    #[arg(long, env = "BLAN_EXECUTION_DELAY")]
    pub execution_delay: Option<u64>,

    /// Seconds a queued proposal stays executable after the timelock.
    #[arg(long, env = "BLAN_EXECUTION_WINDOW")]
    pub execution_window: Option<u64>,

    /// Minimum proposer balance, in whole tokens.
    #[arg(long, env = "BLAN_PROPOSAL_THRESHOLD")]
    pub proposal_threshold: Option<u64>,

    /// Quorum in basis points of total supply.
    #[arg(long, env = "BLAN_QUORUM_BPS")]
    pub quorum_bps: Option<u32>,
}

impl ParamOverrides {
    pub fn apply(&self, base: GovernanceParams) -> GovernanceParams {
        GovernanceParams {
            voting_delay_secs: self.voting_delay.unwrap_or(base.voting_delay_secs),
            voting_period_secs: self.voting_period.unwrap_or(base.voting_period_secs),
            execution_delay_secs: self.execution_delay.unwrap_or(base.execution_delay_secs),
            execution_window_secs: self.execution_window.unwrap_or(base.execution_window_secs),
            proposal_threshold: self
                .proposal_threshold
                .map(|whole| tokens(u128::from(whole)))
                .unwrap_or(base.proposal_threshold),
            quorum_bps: self.quorum_bps.unwrap_or(base.quorum_bps),
            ..base
        }
    }
}

/// Defaults, then the file if given, then overrides. The result is validated.
pub fn resolve_params(file: Option<&Path>, overrides: &ParamOverrides) -> Result<GovernanceParams> {
    let base = match file {
        Some(path) => {
            let params = GovernanceParams::from_toml_file(path)
                .with_context(|| format!("loading governance parameters from {}", path.display()))?;
            info!("loaded governance parameters from {}", path.display());
            params
        }
        None => GovernanceParams::default(),
    };
    let params = overrides.apply(base);
    params.validate().context("governance parameters")?;
    Ok(params)
}
