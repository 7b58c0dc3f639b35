//! Hashlink Ledger: an append-only, tamper-evident ledger in Rust
//!
//! This crate provides a single-writer, in-memory chain of blocks featuring:
//! - SHA-256 digest linkage between consecutive blocks
//! - Proof of Work sealing with a configurable leading-zero difficulty
//! - Bounded and cancellable mining, including a background variant
//! - Whole-chain validation that pinpoints the first broken block
//!
//! # Example
//!
//! ```rust
//! use hashlink_ledger::core::Ledger;
//!
//! // Create a new ledger
//! let mut ledger = Ledger::new(2);
//!
//! // Append some data
//! let block = ledger.append("hello");
//! assert!(block.digest().starts_with("00"));
//!
//! // Validate the chain
//! assert!(ledger.validate());
//!
//! // A tampered copy no longer validates
//! let forged = ledger.blocks()[1].with_payload("goodbye");
//! let tampered = ledger.with_block_replaced(1, forged).unwrap();
//! assert!(!tampered.validate());
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod mining;

// Re-export commonly used types
pub use core::{Block, ChainStats, Ledger, LedgerConfig, LedgerError, DEFAULT_DIFFICULTY};
pub use crypto::{hash, Digest};
pub use mining::{CancelToken, Miner, MiningError, MiningStats};
