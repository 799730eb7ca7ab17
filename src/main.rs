//! Command-line front end for the Kalp gateway relay.
//!
//! ```text
//! kalp-relay [--config relay.toml] [--network DEVNET] <command>
//!
//!   networks                      list known networks
//!   submit   <chaincode> <tx> [params]
//!   evaluate <chaincode> <tx> [params]
//!   transfer <to> <amount> [--raw]
//!   balance  <address> [--wallet-id]
//! ```
//!
//! Credentials come from `[credentials.<NETWORK>]` in the config file or the
//! `KALP_*` environment variables. Ctrl-C abandons the running pipeline.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use kalp_relay::config::{load_config, NetworkId, RelayConfig};
use kalp_relay::input::{self, NATIVE_DECIMALS};
use kalp_relay::observability::logging::init_logging;
use kalp_relay::relay::{ChaincodeCall, RelayClient, RelayError, RelayResult};
use kalp_relay::EnvCredentials;

#[derive(Parser)]
#[command(name = "kalp-relay")]
#[command(about = "Signed transaction relay for Kalp gateways", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Target network (DEVNET, LOADNET, PROD_TESTNET_NEW)
    #[arg(short, long, global = true)]
    network: Option<NetworkId>,

    /// Log level for this crate, overridden by RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known networks
    Networks,
    /// Submit a transaction and print its transaction ID
    Submit {
        chain_code: String,
        transaction: String,
        /// JSON array or comma-separated list
        #[arg(default_value = "")]
        params: String,
    },
    /// Evaluate a transaction and print its result
    Evaluate {
        chain_code: String,
        transaction: String,
        /// JSON array or comma-separated list
        #[arg(default_value = "")]
        params: String,
    },
    /// Transfer native tokens on the network's default chain code
    Transfer {
        to: String,
        /// Amount in whole tokens, e.g. 1.5
        amount: String,
        /// Treat the amount as raw units
        #[arg(long)]
        raw: bool,
    },
    /// Query a balance on the network's default chain code
    Balance {
        /// Wallet address, or a wallet ID with --wallet-id
        address: String,
        /// Treat the argument as a wallet ID and query kwl-<id>-cc
        #[arg(long)]
        wallet_id: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => RelayConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    init_logging(&config.observability.log_level);

    let network = cli.network.unwrap_or(config.default_network);
    tracing::debug!(network = %network, "Configuration loaded");

    let client = match RelayClient::from_config(&config, EnvCredentials::new()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        result = run(&client, network, cli.command) => match result {
            Ok(output) => {
                println!("{}", output);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning pipeline");
            eprintln!("Aborted");
            ExitCode::from(130)
        }
    }
}

async fn run(client: &RelayClient, network: NetworkId, command: Commands) -> RelayResult<String> {
    match command {
        Commands::Networks => Ok(list_networks(client, network)),
        Commands::Submit {
            chain_code,
            transaction,
            params,
        } => {
            let call = ChaincodeCall::new(
                chain_code.trim(),
                transaction.trim(),
                input::parse_transaction_params(&params),
            );
            client.submit_call(network, call).await
        }
        Commands::Evaluate {
            chain_code,
            transaction,
            params,
        } => {
            let call = ChaincodeCall::new(
                chain_code.trim(),
                transaction.trim(),
                input::parse_transaction_params(&params),
            );
            client.evaluate_call(network, call).await
        }
        Commands::Transfer { to, amount, raw } => {
            let to = input::normalize_address(&to);
            if to.is_empty() {
                return Err(RelayError::InvalidRequest("recipient address is empty".to_string()));
            }
            let amount = if raw {
                amount.trim().to_string()
            } else {
                input::to_raw_units(&amount, NATIVE_DECIMALS)
                    .ok_or_else(|| RelayError::InvalidRequest(format!("invalid amount '{}'", amount)))?
            };
            client.transfer(network, &to, &amount).await
        }
        Commands::Balance { address, wallet_id } => {
            let target = input::balance_target(&address, wallet_id);
            if target.is_empty() {
                return Err(RelayError::InvalidRequest("address is empty".to_string()));
            }
            client.balance_of(network, &target).await
        }
    }
}

fn list_networks(client: &RelayClient, selected: NetworkId) -> String {
    client
        .networks()
        .map(|(id, profile)| {
            let marker = if id == selected { "*" } else { " " };
            format!(
                "{} {:<17} {:<13} {}  channel={} chaincode={}",
                marker, id, profile.label, profile.gateway_base_url, profile.channel_name, profile.chain_code_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> RelayClient {
        RelayClient::from_config(&RelayConfig::default(), EnvCredentials::with_lookup(|_| None)).unwrap()
    }

    #[test]
    fn test_balance_wallet_id_flag() {
        let cli = Cli::try_parse_from(["kalp-relay", "balance", "Alice", "--wallet-id"]).unwrap();
        match cli.command {
            Commands::Balance { address, wallet_id } => {
                assert_eq!(address, "Alice");
                assert!(wallet_id);
            }
            _ => panic!("expected balance command"),
        }
    }

    #[test]
    fn test_global_network_flag() {
        let cli = Cli::try_parse_from(["kalp-relay", "networks", "--network", "loadnet"]).unwrap();
        assert_eq!(cli.network, Some(NetworkId::Loadnet));
    }

    #[tokio::test]
    async fn test_networks_listing_marks_selection() {
        let output = run(&offline_client(), NetworkId::Loadnet, Commands::Networks)
            .await
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("* LOADNET"));
        assert!(lines[0].starts_with("  DEVNET"));
    }

    #[tokio::test]
    async fn test_blank_balance_target_rejected() {
        let err = run(
            &offline_client(),
            NetworkId::Devnet,
            Commands::Balance {
                address: "   ".to_string(),
                wallet_id: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)));
    }
}
