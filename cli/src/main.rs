//! blan-gov: drive a local governance devnet.

use blan_cli::{Command, ParamOverrides};
use blan_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blan-gov", about = "Token-weighted governance devnet")]
struct Cli {
    /// Devnet state file.
    #[arg(long, default_value = "./blan_devnet.bin", env = "BLAN_STATE")]
    state: PathBuf,

    /// Governance parameters TOML, read by `init`. Flags and env vars
    /// override individual fields.
    #[arg(long, env = "BLAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    params: ParamOverrides,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "BLAN_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "BLAN_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    blan_utils::init_logging(cli.log_format, &cli.log_level);

    let output = match cli.command {
        Command::Init { genesis, force } => {
            let params = blan_cli::resolve_params(cli.config.as_deref(), &cli.params)?;
            blan_cli::init(&cli.state, &genesis, force, params)?
        }
        command => blan_cli::run(&cli.state, command)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
