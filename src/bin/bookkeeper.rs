//! Bookkeeper CLI
//!
//! Adds or removes a bookkeeper by submitting a record signed with the
//! local wallet account.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use bookkeeper_sdk::bookkeeper::{send_bookkeeper_transaction, BookkeeperRequest};
use bookkeeper_sdk::keystore::{FileKeyStore, KeyStore, DEFAULT_WALLET_FILE};
use bookkeeper_sdk::network::{DEFAULT_RPC_URL, RPC_URL_ENV, WALLET_ENV};
use bookkeeper_sdk::program::RandomNonce;
use bookkeeper_sdk::rpc::{RpcClient, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "bookkeeper")]
#[command(about = "Add or remove a bookkeeper", long_about = None)]
struct Cli {
    /// Public key (hex) to add as a bookkeeper
    #[arg(short, long)]
    add: Option<String>,

    /// Public key (hex) to remove as a bookkeeper
    #[arg(short, long)]
    sub: Option<String>,

    /// Authorized certificate
    #[arg(short, long)]
    cert: Option<String>,

    /// Wallet file [env: BOOKKEEPER_WALLET]
    #[arg(long)]
    wallet: Option<PathBuf>,

    /// Node JSON-RPC endpoint [env: BOOKKEEPER_RPC_URL]
    #[arg(long)]
    rpc: Option<String>,

    /// Retries while the node refuses connections
    #[arg(long)]
    retries: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Whether any flag was supplied at all.
    fn has_flags(&self) -> bool {
        self.add.is_some()
            || self.sub.is_some()
            || self.cert.is_some()
            || self.wallet.is_some()
            || self.rpc.is_some()
            || self.retries.is_some()
            || self.timeout.is_some()
            || self.verbose
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !cli.has_flags() {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    let request = match BookkeeperRequest::from_flags(
        cli.add.as_deref(),
        cli.sub.as_deref(),
        cli.cert.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) if e.is_input_error() => {
            println!("{}", e);
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e.into()),
    };

    let wallet = cli
        .wallet
        .or_else(|| std::env::var_os(WALLET_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WALLET_FILE));
    let account = match FileKeyStore::new(&wallet).load_account() {
        Ok(account) => account,
        Err(e) => {
            eprintln!("Failed to open wallet: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let url = cli
        .rpc
        .or_else(|| std::env::var(RPC_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    let client = RpcClient::builder(&url)
        .timeout(Duration::from_secs(cli.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)))
        .retries(cli.retries.unwrap_or(0))
        .build()
        .context("Failed to create RPC client")?;

    let response = send_bookkeeper_transaction(
        &request,
        &account,
        RandomNonce::thread_local(),
        &client,
    )
    .await
    .with_context(|| format!("Bookkeeper transaction failed ({})", url))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bookkeeper").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_shows_help() {
        assert!(!parse(&[]).has_flags());
    }

    #[test]
    fn test_wallet_alone_reports_missing_selector() {
        let cli = parse(&["--wallet", "w.json"]);
        assert!(cli.has_flags());

        let err =
            BookkeeperRequest::from_flags(cli.add.as_deref(), cli.sub.as_deref(), cli.cert.as_deref())
                .unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("missing --add or --sub"));
    }

    #[test]
    fn test_every_flag_counts() {
        for args in [
            &["--rpc", "http://localhost:30003"][..],
            &["--retries", "2"][..],
            &["--timeout", "5"][..],
            &["-v"][..],
            &["-c", "cert"][..],
        ] {
            assert!(parse(args).has_flags(), "{:?} should count as a flag", args);
        }
    }
}
