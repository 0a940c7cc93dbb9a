//! Deploys the staking contract and prints its address.
//!
//! Exit status is 0 on success and 1 on any error.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use staking_client::config::load_or_default;
use staking_client::deploy::{deploy, DeployError, DeployOptions, DeployPlan};
use staking_client::observability::logging;

#[derive(Parser)]
#[command(name = "deploy")]
#[command(about = "Deploy the staking contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "staking.toml")]
    config: PathBuf,

    /// Network name from the config (defaults to `default_network`).
    #[arg(short, long)]
    network: Option<String>,

    /// Compiled artifact (overrides `deploy.artifact_path`).
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Staked token address (overrides `deploy.token_address`).
    #[arg(long)]
    token: Option<String>,

    /// Reward rate in percent (overrides `deploy.reward_rate_percent`).
    #[arg(long)]
    reward_rate: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Deployment failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), DeployError> {
    let config = load_or_default(&cli.config).map_err(|e| DeployError::Config(e.to_string()))?;
    logging::init_logging(&config.observability);

    let options = DeployOptions {
        network: cli.network,
        artifact: cli.artifact,
        token: cli.token,
        reward_rate: cli.reward_rate,
    };
    let plan = DeployPlan::resolve(&config, &options)?;
    println!("Deploying contracts with the account: {}", plan.wallet.address());

    let deployment = deploy(&plan).await?;
    tracing::info!(
        tx_hash = %deployment.tx_hash,
        block_number = ?deployment.block_number,
        "Deployment confirmed"
    );
    println!("Staking contract deployed to: {}", deployment.contract_address);
    Ok(())
}
