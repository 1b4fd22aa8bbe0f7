//! `coffer` binary: loads the wallet file, connects to the chain endpoint,
//! and drives the interactive balance-and-transfer run.

use std::fs;
use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffer_core::orchestrator::TransferOrchestrator;
use coffer_core::prompt::{Prompt, TransferIntent};
use coffer_core::records;
use coffer_core::token::TxParams;
use coffer_evm::{address, units};
use coffer_rpc::HttpRpcClient;

#[derive(Parser)]
#[command(
    name = "coffer",
    about = "Query balances and send ERC-20 transfers from password-encrypted wallets",
    version
)]
struct Args {
    /// JSON-RPC endpoint of the chain node.
    #[arg(long)]
    rpc: String,

    /// Chain id transfers are signed for; verified against the endpoint at
    /// startup.
    #[arg(long)]
    chain_id: u64,

    /// Gas price in gwei applied to every transfer.
    #[arg(long, default_value_t = 10)]
    gas_price_gwei: u64,

    /// Gas limit applied to every transfer.
    #[arg(long, default_value_t = 60_000)]
    gas_limit: u64,

    /// Path to the wallet configuration file.
    #[arg(long, default_value = "wallets.json")]
    wallets: String,

    /// Display symbol for the native coin.
    #[arg(long, default_value = "ETH")]
    native_symbol: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffer=info,coffer_core=info,coffer_rpc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let json = fs::read_to_string(&args.wallets)
        .with_context(|| format!("reading wallet file {}", args.wallets))?;
    let wallets = records::parse_wallets(&json)
        .with_context(|| format!("parsing wallet file {}", args.wallets))?;

    let client = HttpRpcClient::new(&args.rpc).context("building RPC client")?;
    let endpoint_chain = client
        .chain_id()
        .with_context(|| format!("querying chain id from {}", args.rpc))?;
    if endpoint_chain != args.chain_id {
        bail!(
            "chain id mismatch: endpoint reports {endpoint_chain}, expected {}",
            args.chain_id
        );
    }
    tracing::info!(chain_id = args.chain_id, wallets = wallets.len(), "connected");

    let params = TxParams {
        chain_id: args.chain_id,
        gas_price: u128::from(args.gas_price_gwei) * units::WEI_PER_GWEI,
        gas_limit: args.gas_limit,
    };

    let mut prompt = StdioPrompt;
    let report =
        TransferOrchestrator::new(&client, params, &args.native_symbol).run(&wallets, &mut prompt);

    println!(
        "done: {} wallet(s), {} transfer(s) sent, {} failure(s)",
        report.wallets.len(),
        report.transfers_sent(),
        report.failed_wallets() + report.failed_tokens()
    );
    Ok(())
}

/// Interactive prompt over stdin/stdout. Recipient addresses and amounts
/// are validated here and re-asked until they parse, so the orchestrator
/// receives clean values.
struct StdioPrompt;

impl Prompt for StdioPrompt {
    fn password(&mut self, wallet_address: &str) -> Option<SecretString> {
        print!("Password for {wallet_address} (empty to skip): ");
        io::stdout().flush().ok()?;
        let entered = rpassword::read_password().ok()?;
        if entered.is_empty() {
            return None;
        }
        Some(SecretString::from(entered))
    }

    fn offer_transfer(&mut self, symbol: &str) -> Option<TransferIntent> {
        let answer = read_line(&format!("Do you want to send {symbol}? (y/n): "))?;
        if !answer.eq_ignore_ascii_case("y") {
            return None;
        }

        let recipient = loop {
            let entered = read_line("To address: ")?;
            match address::validate_address(&entered) {
                Ok(true) => break entered,
                Ok(false) => println!("bad EIP-55 checksum, try again"),
                Err(e) => println!("{e}, try again"),
            }
        };

        let amount = loop {
            let entered = read_line(&format!("Amount of {symbol} to send: "))?;
            match units::parse_units(&entered, units::DEFAULT_TOKEN_DECIMALS) {
                Ok(_) => break entered,
                Err(e) => println!("{e}, try again"),
            }
        };

        Some(TransferIntent { recipient, amount })
    }

    fn show(&mut self, line: &str) {
        println!("{line}");
    }
}

fn read_line(prompt_text: &str) -> Option<String> {
    print!("{prompt_text}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    // Zero bytes read is EOF; treat it like a declined prompt.
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim().to_string())
}
