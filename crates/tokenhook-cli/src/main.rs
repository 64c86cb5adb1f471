//! # tokenhook CLI
//!
//! Entry point for the `tokenhook` binary.
//!
//! Subcommands:
//! - `tokenhook info`: Token name, symbol, decimals, total supply
//! - `tokenhook balance`: Balance of an address
//! - `tokenhook allowance`: Allowance granted by an owner to a spender
//! - `tokenhook approve`: Approve a spender
//! - `tokenhook transfer`: Transfer tokens
//! - `tokenhook transfer-from`: Transfer tokens on behalf of an owner

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokenhook_evm::Address;
use tracing_subscriber::EnvFilter;

mod commands;

/// tokenhook: read and write an ERC-20 token from the command line.
#[derive(Parser)]
#[command(name = "tokenhook", version, about)]
struct Cli {
    /// Path to a connection config YAML file.
    #[arg(long, short, global = true, env = "TOKENHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint URL (overrides the config file).
    #[arg(long, global = true, env = "TOKENHOOK_RPC_URL")]
    rpc_url: Option<String>,

    /// Token contract address (overrides the config file).
    #[arg(long, global = true)]
    token: Option<String>,

    /// Name of an env var holding a hex private key (overrides the config signer).
    #[arg(long, global = true)]
    private_key_env: Option<String>,

    /// Skip the confirmation prompt on write commands.
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show token name, symbol, decimals and total supply.
    Info,

    /// Show the token balance of an address.
    Balance {
        /// Owner address (0x...).
        owner: Address,
    },

    /// Show how much a spender may transfer on behalf of an owner.
    Allowance {
        /// Owner address (0x...).
        owner: Address,
        /// Spender address (0x...).
        spender: Address,
    },

    /// Approve a spender for a human-readable amount (e.g. "12.5").
    Approve {
        /// Spender address (0x...).
        spender: Address,
        /// Amount in whole tokens; scaled by the token's decimals.
        amount: rust_decimal::Decimal,
    },

    /// Transfer tokens to a recipient.
    Transfer {
        /// Recipient address (0x...).
        to: Address,
        /// Amount in whole tokens; scaled by the token's decimals.
        amount: rust_decimal::Decimal,
    },

    /// Transfer tokens from an owner who approved the signer.
    TransferFrom {
        /// Owner address (0x...).
        from: Address,
        /// Recipient address (0x...).
        to: Address,
        /// Amount in whole tokens; scaled by the token's decimals.
        amount: rust_decimal::Decimal,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let overrides = commands::Overrides {
        config: cli.config,
        rpc_url: cli.rpc_url,
        token: cli.token,
        private_key_env: cli.private_key_env,
    };

    let result = match cli.command {
        Commands::Info => commands::read::info(overrides).await,
        Commands::Balance { owner } => commands::read::balance(overrides, owner).await,
        Commands::Allowance { owner, spender } => {
            commands::read::allowance(overrides, owner, spender).await
        }
        Commands::Approve { spender, amount } => {
            commands::write::approve(overrides, spender, amount, cli.yes).await
        }
        Commands::Transfer { to, amount } => {
            commands::write::transfer(overrides, to, amount, cli.yes).await
        }
        Commands::TransferFrom { from, to, amount } => {
            commands::write::transfer_from(overrides, from, to, amount, cli.yes).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
