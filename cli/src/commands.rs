//! Subcommands and their JSON output.

use anyhow::{bail, ensure, Context, Result};
use blan_governance::{
    GovernanceParams, ProposalPayload, ProposalStatus, Support, TargetParam, VoteRecord,
};
use blan_types::{format_tokens, tokens, Address};
use blan_utils::format_duration;
use clap::Subcommand;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::account::parse_account;
use crate::devnet::Devnet;
use crate::genesis::GenesisConfig;

/// A vote direction given by name or wire value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupportArg(pub Support);

impl FromStr for SupportArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let support = match s.to_ascii_lowercase().as_str() {
            "for" | "yes" | "1" => Support::For,
            "against" | "no" | "0" => Support::Against,
            "abstain" | "2" => Support::Abstain,
            other => return Err(format!("unknown vote '{other}', expected for, against or abstain")),
        };
        Ok(Self(support))
    }
}

/// A parameter name accepted by `propose --param`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamArg(pub TargetParam);

impl FromStr for ParamArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "difficulty" | "mining_difficulty" => Ok(Self(TargetParam::MiningDifficulty)),
            "reward" | "mining_reward" => Ok(Self(TargetParam::MiningReward)),
            other => Err(format!("unknown parameter '{other}', expected difficulty or reward")),
        }
    }
}

fn parse_status(s: &str) -> Result<ProposalStatus, String> {
    [
        ProposalStatus::Pending,
        ProposalStatus::Active,
        ProposalStatus::Defeated,
        ProposalStatus::Succeeded,
        ProposalStatus::Queued,
        ProposalStatus::Executed,
        ProposalStatus::Expired,
        ProposalStatus::Canceled,
    ]
    .into_iter()
    .find(|status| status.as_str() == s.to_ascii_lowercase())
    .ok_or_else(|| format!("unknown status '{s}'"))
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a fresh devnet from a genesis file.
    Init {
        /// Genesis TOML (allocations, mining parameters, start time).
        #[arg(long)]
        genesis: PathBuf,

        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },

    /// Submit a proposal to change a mining parameter.
    Propose {
        /// Proposer account (`0x` address or label).
        #[arg(long)]
        from: String,

        /// Parameter to change: difficulty or reward.
        #[arg(long, default_value = "difficulty")]
        param: ParamArg,

        /// New value (raw units).
        #[arg(long)]
        value: u128,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Cast a vote weighted by the voter's current balance.
    Vote {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        from: String,

        /// for, against or abstain (or 1, 0, 2).
        #[arg(long)]
        support: SupportArg,
    },

    /// Commit the outcome of a proposal whose voting window has closed.
    Finalize {
        #[arg(long)]
        id: u64,
    },

    /// Apply a queued proposal to the mining contract.
    Execute {
        #[arg(long)]
        id: u64,
    },

    /// Withdraw a proposal before voting closes.
    Cancel {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        from: String,
    },

    /// Show one proposal with its resolved status and outcome.
    Show {
        #[arg(long)]
        id: u64,
    },

    /// Show how an account voted on a proposal.
    VoteOf {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        account: String,
    },

    /// List proposals, optionally only those in one status.
    List {
        #[arg(long, value_parser = parse_status)]
        status: Option<ProposalStatus>,
    },

    /// Move the devnet clock forward.
    Advance {
        #[arg(long)]
        secs: u64,
    },

    /// Move tokens between accounts.
    Transfer {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Whole tokens.
        #[arg(long)]
        tokens: u64,
    },

    /// Account balance.
    Balance {
        #[arg(long)]
        account: String,
    },

    /// Devnet clock, token supply, mining parameters and parameters in force.
    Status,

    /// Print the address a label maps to.
    Address { label: String },
}

fn proposal_json(devnet: &Devnet, id: u64) -> Result<Value> {
    let engine = &devnet.engine;
    let params = engine.params();
    let p = engine.get_proposal(id)?;
    let outcome = engine.outcome(id)?;
    Ok(json!({
        "id": p.id,
        "proposer": p.proposer.to_string(),
        "param": p.payload.param.name(),
        "new_value": p.payload.new_value.to_string(),
        "description": p.description,
        "status": engine.state(id)?.as_str(),
        "committed_status": p.status.as_str(),
        "created_at": p.created_at.as_secs(),
        "voting_starts": p.voting_starts.as_secs(),
        "voting_ends": p.voting_ends.as_secs(),
        "queued_at": p.queued_at.map(|t| t.as_secs()),
        "execution_eta": p.execution_eta(params).map(|t| t.as_secs()),
        "execution_deadline": p.execution_deadline(params).map(|t| t.as_secs()),
        "executed": p.executed,
        "for_votes": p.for_votes.to_string(),
        "against_votes": p.against_votes.to_string(),
        "abstain_votes": p.abstain_votes.to_string(),
        "quorum": outcome.quorum.to_string(),
        "quorum_met": outcome.quorum_met,
        "approved": outcome.approved,
    }))
}

fn vote_json(id: u64, account: &Address, vote: &VoteRecord) -> Value {
    json!({
        "id": id,
        "account": account.to_string(),
        "has_voted": vote.has_voted,
        "support": u8::from(vote.support),
        "weight": vote.weight.to_string(),
        "cast_at": vote.cast_at.as_secs(),
    })
}

fn account(s: &str) -> Result<Address> {
    parse_account(s).with_context(|| format!("account '{s}'"))
}

/// Create the state file for a new devnet.
pub fn init(state: &Path, genesis: &Path, force: bool, params: GovernanceParams) -> Result<Value> {
    ensure!(
        force || !state.exists(),
        "{} already exists (pass --force to replace it)",
        state.display()
    );
    let genesis = GenesisConfig::from_toml_file(genesis)?;
    let devnet = Devnet::from_genesis(&genesis, params)?;
    devnet.save(state)?;
    Ok(status_json(&devnet))
}

fn status_json(devnet: &Devnet) -> Value {
    let params = devnet.engine.params();
    json!({
        "now": devnet.engine.now().as_secs(),
        "governance": devnet.engine.address().to_string(),
        "total_supply": format_tokens(devnet.token.total_supply()),
        "holders": devnet.token.holder_count(),
        "mining": {
            "owner": devnet.mining.owner().to_string(),
            "difficulty": devnet.mining.difficulty().to_string(),
            "reward": devnet.mining.reward().to_string(),
        },
        "params": {
            "voting_delay_secs": params.voting_delay_secs,
            "voting_period_secs": params.voting_period_secs,
            "execution_delay_secs": params.execution_delay_secs,
            "execution_window_secs": params.execution_window_secs,
            "proposal_threshold": params.proposal_threshold.to_string(),
            "quorum_bps": params.quorum_bps,
            "timeline": format!(
                "delay {}, voting {}, timelock {}, window {}",
                format_duration(params.voting_delay_secs),
                format_duration(params.voting_period_secs),
                format_duration(params.execution_delay_secs),
                format_duration(params.execution_window_secs),
            ),
        },
        "proposals": devnet.engine.proposal_count(),
    })
}

impl Command {
    /// Whether the command can change devnet state.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Propose { .. }
                | Self::Vote { .. }
                | Self::Finalize { .. }
                | Self::Execute { .. }
                | Self::Cancel { .. }
                | Self::Advance { .. }
                | Self::Transfer { .. }
        )
    }
}

/// Run a command against an existing devnet. `Init` is handled by [`init`].
///
/// Mutating commands save the devnet even when they fail: rejected calls
/// commit nothing, except an execute that finds its window lapsed, which
/// commits `Expired` before reporting the error.
pub fn run(state: &Path, command: Command) -> Result<Value> {
    match &command {
        Command::Init { .. } => bail!("init creates a devnet and cannot run against one"),
        Command::Address { label } => {
            return Ok(json!({ "label": label, "address": account(label)?.to_string() }));
        }
        _ => {}
    }
    let mut devnet = Devnet::load(state)?;
    let mutates = command.mutates();
    let output = if mutates {
        apply(&mut devnet, command)
    } else {
        view(&devnet, command)
    };
    if mutates {
        devnet.save(state)?;
    }
    output
}

fn apply(devnet: &mut Devnet, command: Command) -> Result<Value> {
    match command {
        Command::Propose {
            from,
            param,
            value,
            description,
        } => {
            let payload = ProposalPayload {
                param: param.0,
                new_value: value,
            };
            let id = devnet
                .engine
                .propose(&account(&from)?, payload, description)?;
            proposal_json(devnet, id)
        }

        Command::Vote { id, from, support } => {
            let voter = account(&from)?;
            let vote = devnet.engine.cast_vote(id, &voter, support.0)?;
            Ok(vote_json(id, &voter, &vote))
        }

        Command::Finalize { id } => {
            let outcome = devnet.engine.finalize_proposal(id)?;
            Ok(json!({ "id": id, "outcome": outcome.as_str() }))
        }

        Command::Execute { id } => {
            devnet.engine.execute_proposal(id)?;
            Ok(json!({
                "id": id,
                "status": ProposalStatus::Executed.as_str(),
                "difficulty": devnet.mining.difficulty().to_string(),
                "reward": devnet.mining.reward().to_string(),
            }))
        }

        Command::Cancel { id, from } => {
            devnet.engine.cancel_proposal(id, &account(&from)?)?;
            Ok(json!({ "id": id, "status": ProposalStatus::Canceled.as_str() }))
        }

        Command::Advance { secs } => {
            devnet.clock.advance(secs);
            info!(secs, now = %devnet.engine.now(), "clock advanced");
            Ok(json!({ "now": devnet.engine.now().as_secs() }))
        }

        Command::Transfer {
            from,
            to,
            tokens: amount,
        } => {
            let (from, to) = (account(&from)?, account(&to)?);
            devnet
                .token
                .transfer(&from, &to, tokens(u128::from(amount)))?;
            Ok(json!({
                "from": from.to_string(),
                "to": to.to_string(),
                "from_balance": format_tokens(devnet.token.balance_of(&from)),
                "to_balance": format_tokens(devnet.token.balance_of(&to)),
            }))
        }

        other => view(devnet, other),
    }
}

fn view(devnet: &Devnet, command: Command) -> Result<Value> {
    match command {
        Command::Show { id } => proposal_json(devnet, id),

        Command::VoteOf { id, account: who } => {
            let who = account(&who)?;
            let vote = devnet.engine.get_vote(id, &who)?;
            Ok(vote_json(id, &who, &vote))
        }

        Command::List { status } => {
            let ids: Vec<u64> = match status {
                Some(status) => devnet.engine.proposals_in_state(status),
                None => devnet.engine.proposals().map(|p| p.id).collect(),
            };
            ids.into_iter()
                .map(|id| proposal_json(devnet, id))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }

        Command::Balance { account: who } => {
            let who = account(&who)?;
            let balance = devnet.token.balance_of(&who);
            Ok(json!({
                "account": who.to_string(),
                "balance": balance.to_string(),
                "display": format_tokens(balance),
            }))
        }

        Command::Status => Ok(status_json(devnet)),

        other => bail!("{other:?} cannot run here"),
    }
}
