//! A local devnet: token ledger, mining contract, governance engine and a
//! simulated clock, persisted together in one state file.

use anyhow::{bail, Context, Result};
use blan_governance::{GovernanceEngine, GovernanceParams};
use blan_nullables::NullClock;
use blan_token::{MiningContract, MiningSnapshot, TokenLedger, TokenSnapshot};
use blan_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::account::governance_address;
use crate::genesis::GenesisConfig;

/// Bumped whenever the on-disk layout changes.
const STATE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct DevnetState {
    version: u32,
    now: u64,
    params: GovernanceParams,
    token: TokenSnapshot,
    mining: MiningSnapshot,
    registry: Vec<u8>,
}

pub struct Devnet {
    pub clock: Arc<NullClock>,
    pub token: Arc<TokenLedger>,
    pub mining: Arc<MiningContract>,
    pub engine: GovernanceEngine,
}

impl Devnet {
    pub fn from_genesis(genesis: &GenesisConfig, params: GovernanceParams) -> Result<Self> {
        let start = genesis
            .start_time
            .unwrap_or_else(|| Timestamp::now().as_secs());
        let deployer = genesis.deployer_address()?;

        let token = TokenLedger::genesis(genesis.resolved_allocations()?)?;
        let mining = MiningContract::new(deployer, genesis.mining.difficulty, genesis.mining.reward)?;
        if genesis.hand_over {
            mining.transfer_ownership(&deployer, governance_address())?;
        }

        let devnet = Self::assemble(start, params, token, mining)?;
        info!(
            start,
            supply = devnet.token.total_supply(),
            owner = %devnet.mining.owner(),
            "devnet created"
        );
        Ok(devnet)
    }

    fn assemble(
        now: u64,
        params: GovernanceParams,
        token: TokenLedger,
        mining: MiningContract,
    ) -> Result<Self> {
        let clock = Arc::new(NullClock::new(now));
        let token = Arc::new(token);
        let mining = Arc::new(mining);
        let engine = GovernanceEngine::new(
            governance_address(),
            params,
            clock.clone(),
            token.clone(),
            mining.clone(),
        )?;
        Ok(Self {
            clock,
            token,
            mining,
            engine,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| {
            format!(
                "reading devnet state {} (run `blan-gov init` first)",
                path.display()
            )
        })?;
        let state: DevnetState =
            bincode::deserialize(&bytes).context("decoding devnet state")?;
        if state.version != STATE_VERSION {
            bail!(
                "state file version {} is not supported (expected {})",
                state.version,
                STATE_VERSION
            );
        }

        let token = TokenLedger::from_snapshot(state.token)?;
        let mining = MiningContract::from_snapshot(state.mining)?;
        let mut devnet = Self::assemble(state.now, state.params, token, mining)?;
        devnet.engine.load_state(&state.registry)?;
        debug!(path = %path.display(), now = state.now, "devnet loaded");
        Ok(devnet)
    }

    /// Write the state next to `path` and rename it into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let state = DevnetState {
            version: STATE_VERSION,
            now: self.engine.now().as_secs(),
            params: self.engine.params().clone(),
            token: self.token.snapshot(),
            mining: self.mining.snapshot(),
            registry: self.engine.save_state()?,
        };
        let bytes = bincode::serialize(&state).context("encoding devnet state")?;

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        debug!(path = %path.display(), "devnet saved");
        Ok(())
    }
}
