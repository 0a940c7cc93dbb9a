//! Staking client CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin / subcommand ──▶ Action ──▶ ViewModel::update ──▶ Effect
//!                                          ▲                  │
//!                                          │                  ▼
//!   wallet watcher ──▶ WalletEvent ────────┤          Runtime (tokio tasks)
//!   (chain poll, key file)                 │                  │
//!                                          │                  ▼
//!                                  completion Action ◀── StakingClient ──▶ JSON-RPC
//! ```
//!
//! One-shot subcommands mount the page, run one action, print the page and
//! exit. `watch` keeps the page open, reads commands from stdin and reloads
//! the session whenever the wallet's chain or account changes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use staking_client::blockchain::BlockchainClient;
use staking_client::config::{load_or_default, select_network, StakingConfig};
use staking_client::lifecycle::{listen_for_ctrl_c, Shutdown};
use staking_client::observability::{logging, metrics};
use staking_client::session::{RpcConnector, WalletEventHub, WalletListener, WalletWatcher};
use staking_client::view::{render, Action, Runtime};

#[derive(Parser)]
#[command(name = "staking")]
#[command(about = "Stake, unstake and claim rewards on a deployed staking contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "staking.toml")]
    config: PathBuf,

    /// Network name from the config (defaults to `default_network`).
    #[arg(short, long)]
    network: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the connected account's staking record
    Status,
    /// Stake tokens (decimal amount, e.g. 1.5)
    Stake { amount: String },
    /// Unstake tokens (decimal amount, e.g. 1.5)
    Unstake { amount: String },
    /// Claim the accrued reward
    Claim,
    /// Keep the page open and read commands from stdin
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let connector = match select_network(&config, cli.network.as_deref())
        .map_err(|e| e.to_string())
        .and_then(|network| RpcConnector::new(&config, network).map_err(|e| e.to_string()))
    {
        Ok(connector) => connector,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut runtime = Runtime::new(connector.clone(), config.retries.clone());

    match cli.command {
        Commands::Status => one_shot(&mut runtime, None).await,
        Commands::Stake { amount } => one_shot(&mut runtime, Some((Some(amount), Action::Stake))).await,
        Commands::Unstake { amount } => {
            one_shot(&mut runtime, Some((Some(amount), Action::Unstake))).await
        }
        Commands::Claim => one_shot(&mut runtime, Some((None, Action::Claim))).await,
        Commands::Watch => watch(runtime, &connector, &config).await,
    }
}

/// Mount, optionally run one action, print the page.
async fn one_shot(
    runtime: &mut Runtime<RpcConnector>,
    action: Option<(Option<String>, Action)>,
) -> ExitCode {
    runtime.dispatch(Action::Mount);
    runtime.drive_until_idle().await;

    if runtime.model().session().is_none() {
        print!("{}", render(runtime.model()));
        return ExitCode::FAILURE;
    }

    let succeeded = match action {
        None => runtime.model().record().is_some(),
        Some((amount, action)) => {
            if let Some(amount) = amount {
                runtime.dispatch(Action::AmountChanged(amount));
            }
            runtime.dispatch(action);
            runtime.drive_until_idle().await;
            runtime.model().last_tx().is_some()
        }
    };

    print!("{}", render(runtime.model()));
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn watch(
    mut runtime: Runtime<RpcConnector>,
    connector: &RpcConnector,
    config: &StakingConfig,
) -> ExitCode {
    let read_client = match BlockchainClient::new(connector.network(), None) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut listener = WalletListener::new(WalletWatcher::new(
        WalletEventHub::new(),
        read_client,
        Duration::from_secs(config.wallet.chain_poll_secs),
        connector.key_source().clone(),
    ));
    if let Err(e) = listener.restart() {
        tracing::error!(error = %e, "Failed to watch wallet changes");
    }

    let shutdown = Shutdown::new();
    let mut stop = shutdown.subscribe();
    listen_for_ctrl_c(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();
    runtime.dispatch(Action::Mount);
    print!("{}", render(runtime.model()));

    loop {
        tokio::select! {
            _ = stop.recv() => break,
            action = runtime.next_action() => {
                runtime.dispatch(action);
                if let Some(session) = runtime.model().session() {
                    listener.observe(session);
                }
                print!("{}", render(runtime.model()));
            }
            // The listener restarts itself after every event, so a failed
            // reconnect still leaves the next change observable.
            Some(event) = listener.next_event() => {
                runtime.dispatch(Action::Wallet(event));
                print!("{}", render(runtime.model()));
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_command(&mut runtime, line.trim()) {
                        break;
                    }
                    print!("{}", render(runtime.model()));
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read stdin");
                    break;
                }
            },
        }
    }

    drop(listener);
    tracing::info!("Session closed");
    ExitCode::SUCCESS
}

/// Returns false when the user asked to quit.
fn handle_command(runtime: &mut Runtime<RpcConnector>, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let argument = parts.next();

    match (command, argument) {
        ("", _) => {}
        ("quit" | "exit", _) => return false,
        ("help", _) => print_help(),
        ("amount", Some(amount)) => runtime.dispatch(Action::AmountChanged(amount.to_string())),
        ("stake", amount) | ("unstake", amount) => {
            if let Some(amount) = amount {
                runtime.dispatch(Action::AmountChanged(amount.to_string()));
            }
            let action = if command == "stake" {
                Action::Stake
            } else {
                Action::Unstake
            };
            runtime.dispatch(action);
        }
        ("claim", _) => runtime.dispatch(Action::Claim),
        ("refresh", _) => runtime.dispatch(Action::Refresh),
        _ => eprintln!("Unknown command '{}'; type 'help'", line),
    }
    true
}

fn print_help() {
    println!("Commands: amount <n> | stake [n] | unstake [n] | claim | refresh | help | quit");
}
