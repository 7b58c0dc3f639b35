//! CLI commands for the ledger
//!
//! Implements the command handlers for the CLI interface. All rendering
//! lives here; the engine only hands back blocks and results.

use crate::core::{Block, Ledger, LedgerConfig};
use crate::mining::{CancelToken, MiningStats};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Printable view of a block
#[derive(Debug, Serialize)]
pub struct BlockView {
    pub index: usize,
    pub payload: String,
    pub digest: String,
    pub previous_digest: String,
    pub nonce: u64,
}

impl BlockView {
    pub fn new(index: usize, block: &Block) -> Self {
        let payload = match block.payload_text() {
            Some(text) => text.to_string(),
            None => format!("0x{}", hex::encode(block.payload())),
        };

        Self {
            index,
            payload,
            digest: block.digest().to_string(),
            previous_digest: block.previous_digest().to_string(),
            nonce: block.nonce(),
        }
    }
}

/// Resolve the ledger configuration from an optional JSON file and flag overrides
pub fn load_config(
    path: Option<&Path>,
    difficulty: Option<u32>,
    max_attempts: Option<u64>,
) -> CliResult<LedgerConfig> {
    let mut config = match path {
        Some(path) => {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data)?
        }
        None => LedgerConfig::default(),
    };

    if let Some(d) = difficulty {
        config.difficulty = d;
    }
    if max_attempts.is_some() {
        config.max_attempts = max_attempts;
    }

    Ok(config)
}

/// Build a ledger and mine every payload onto it
fn build_ledger(config: LedgerConfig, payloads: &[String]) -> CliResult<(Ledger, Vec<MiningStats>)> {
    let mut ledger = Ledger::with_config(config);
    let cancel = CancelToken::new();
    let mut stats = Vec::with_capacity(payloads.len());

    for payload in payloads {
        let (_, s) = if ledger.config().max_attempts.is_some() {
            ledger.try_append(payload.as_bytes(), &cancel)?
        } else {
            ledger.append_with_stats(payload.as_bytes())
        };
        stats.push(s);
    }

    Ok((ledger, stats))
}

fn print_block(view: &BlockView) {
    println!("   #{} | {}", view.index, view.payload);
    println!("   ├─ Digest: {}", view.digest);
    println!("   ├─ Previous: {}", view.previous_digest);
    println!("   └─ Nonce: {}", view.nonce);
}

/// Show the genesis block
pub fn cmd_genesis(config: LedgerConfig, json: bool) -> CliResult<()> {
    let ledger = Ledger::with_config(config);
    let view = BlockView::new(0, ledger.genesis());

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("🧱 Genesis block");
        print_block(&view);
    }

    Ok(())
}

/// Mine payloads into a fresh ledger and validate it
pub fn cmd_mine(config: LedgerConfig, payloads: &[String], json: bool) -> CliResult<()> {
    if !json {
        println!(
            "⛏️  Mining {} block(s) at difficulty {}",
            payloads.len(),
            config.difficulty
        );
    }

    let (ledger, stats) = build_ledger(config, payloads)?;

    if json {
        let views: Vec<BlockView> = ledger
            .blocks()
            .iter()
            .enumerate()
            .map(|(i, b)| BlockView::new(i, b))
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    print_block(&BlockView::new(0, ledger.genesis()));
    for (i, (block, s)) in ledger.blocks()[1..].iter().zip(&stats).enumerate() {
        println!();
        print_block(&BlockView::new(i + 1, block));
        println!(
            "      {}ms, {} attempts, {:.2} H/s",
            s.time_ms, s.hash_attempts, s.hash_rate
        );
    }

    println!();
    cmd_validate(&ledger);

    Ok(())
}

/// Mine payloads, then show that a tampered copy fails validation
pub fn cmd_tamper(
    config: LedgerConfig,
    payloads: &[String],
    index: usize,
    replacement: &str,
) -> CliResult<()> {
    let (ledger, _) = build_ledger(config, payloads)?;

    let original = ledger
        .get_block(index)
        .ok_or_else(|| format!("No block at index {} (height {})", index, ledger.height()))?;
    let tampered = ledger.with_block_replaced(index, original.with_payload(replacement))?;

    println!(
        "✏️  Rewriting block {} payload {:?} -> {:?}",
        index,
        BlockView::new(index, original).payload,
        replacement
    );

    println!("\n   Original chain:");
    cmd_validate(&ledger);
    println!("\n   Tampered copy:");
    cmd_validate(&tampered);

    Ok(())
}

/// Validate the ledger
pub fn cmd_validate(ledger: &Ledger) {
    println!("🔍 Validating ledger...");

    match ledger.verify() {
        Ok(()) => {
            println!("✅ Ledger is valid!");
            println!("   {} blocks verified", ledger.len());
        }
        Err(e) => {
            println!("❌ Ledger validation FAILED!");
            println!("   {}", e);
        }
    }
}
