//! Mining module for proof of work nonce search

pub mod miner;

pub use miner::{CancelToken, Miner, MiningError, MiningStats};
