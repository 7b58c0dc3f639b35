//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Blocks (payload, digest linkage and proof of work nonce)
//! - Ledger (chain management, appends and validation)

pub mod block;
pub mod ledger;

pub use block::{Block, GENESIS_PAYLOAD, GENESIS_SEED, SENTINEL_SEED};
pub use ledger::{ChainStats, Ledger, LedgerConfig, LedgerError, DEFAULT_DIFFICULTY};
