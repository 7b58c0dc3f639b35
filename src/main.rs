//! Hashlink Ledger CLI Application
//!
//! A command-line driver that builds an in-memory ledger, mines payloads
//! onto it and demonstrates tamper detection.

use clap::{Parser, Subcommand};
use hashlink_ledger::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "An append-only, tamper-evident ledger in Rust", long_about = None)]
struct Cli {
    /// JSON file with ledger configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Mining difficulty (number of leading zero hex characters)
    #[arg(short, long, global = true)]
    difficulty: Option<u32>,

    /// Give up mining a block after this many nonces
    #[arg(long, global = true)]
    max_attempts: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the genesis block
    Genesis {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mine payloads into a new ledger and validate it
    Mine {
        /// Payloads to append, in order
        #[arg(required = true)]
        payloads: Vec<String>,

        /// Print the chain as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show that rewriting a mined block breaks validation
    Tamper {
        /// Payloads to append, in order
        #[arg(required = true)]
        payloads: Vec<String>,

        /// Index of the block to rewrite
        #[arg(short, long, default_value = "1")]
        index: usize,

        /// Replacement payload
        #[arg(short, long, default_value = "tampered")]
        payload: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref(), cli.difficulty, cli.max_attempts)?;

    match cli.command {
        Commands::Genesis { json } => {
            cli::cmd_genesis(config, json)?;
        }

        Commands::Mine { payloads, json } => {
            cli::cmd_mine(config, &payloads, json)?;
        }

        Commands::Tamper {
            payloads,
            index,
            payload,
        } => {
            cli::cmd_tamper(config, &payloads, index, &payload)?;
        }
    }

    Ok(())
}
