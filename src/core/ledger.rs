//! Ledger implementation
//!
//! The ledger engine owns the ordered chain of blocks, appends new blocks
//! by mining them on top of the tip, and validates hash linkage.

use crate::core::block::Block;
use crate::crypto::Digest;
use crate::mining::{CancelToken, Miner, MiningError, MiningStats};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default mining difficulty (number of leading zero hex characters)
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Ledger-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Block {index}: previous digest does not match its predecessor")]
    BrokenLink { index: usize },
    #[error("Block {index}: stored digest does not match its content")]
    DigestMismatch { index: usize },
    #[error("Block {index}: digest does not meet difficulty {difficulty}")]
    InsufficientWork { index: usize, difficulty: u32 },
    #[error("Block not found: {0}")]
    BlockNotFound(usize),
    #[error("Mining failed: {0}")]
    Mining(#[from] MiningError),
}

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Required leading zero hex characters for appended blocks, 0 disables PoW
    pub difficulty: u32,
    /// Nonce budget for `try_append`, `None` for unbounded
    pub max_attempts: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
        }
    }
}

/// Chain statistics
#[derive(Debug, Clone)]
pub struct ChainStats {
    pub height: u64,
    pub total_blocks: u64,
    pub payload_bytes: u64,
    pub difficulty: u32,
    pub latest_digest: Digest,
}

/// The ledger engine
#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    /// The chain of blocks, genesis first
    blocks: Vec<Block>,
    #[serde(flatten)]
    config: LedgerConfig,
}

impl Ledger {
    /// Create a new ledger with the given difficulty
    pub fn new(difficulty: u32) -> Self {
        Self::with_config(LedgerConfig {
            difficulty,
            ..Default::default()
        })
    }

    /// Create a ledger from a full configuration
    pub fn with_config(config: LedgerConfig) -> Self {
        let genesis = Block::genesis();
        debug!(
            "Ledger created with difficulty {}, genesis {}",
            config.difficulty,
            genesis.digest()
        );

        Self {
            blocks: vec![genesis],
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn miner(&self) -> Miner {
        Miner {
            difficulty: self.config.difficulty,
            max_attempts: self.config.max_attempts,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false, the genesis block is present from construction
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get ledger height (genesis is height 0)
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64 - 1
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// Get the latest block
    pub fn latest_block(&self) -> &Block {
        // blocks is never empty
        &self.blocks[self.blocks.len() - 1]
    }

    /// Get a block by index
    pub fn get_block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Get a block by digest
    pub fn get_block_by_digest(&self, digest: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.digest() == digest)
    }

    /// Mine `payload` on top of the tip and append it
    ///
    /// The nonce search is unbounded; `max_attempts` is ignored here.
    pub fn append(&mut self, payload: impl Into<Vec<u8>>) -> Block {
        self.append_with_stats(payload).0
    }

    /// Like `append`, also returning the mining statistics
    pub fn append_with_stats(&mut self, payload: impl Into<Vec<u8>>) -> (Block, MiningStats) {
        let payload = payload.into();
        let (block, stats) = self
            .miner()
            .mine(&payload, self.latest_block().digest());

        self.push(block.clone());
        (block, stats)
    }

    /// Mine and append, giving up at `max_attempts` or when `cancel` fires
    ///
    /// On failure the chain is left unchanged.
    pub fn try_append(
        &mut self,
        payload: impl Into<Vec<u8>>,
        cancel: &CancelToken,
    ) -> Result<(Block, MiningStats), LedgerError> {
        let payload = payload.into();
        let (block, stats) = self
            .miner()
            .try_mine(&payload, self.latest_block().digest(), cancel)?;

        self.push(block.clone());
        Ok((block, stats))
    }

    /// Append a block mined elsewhere, e.g. by `Miner::mine_background`
    pub fn commit(&mut self, block: Block) -> Result<Block, LedgerError> {
        let index = self.blocks.len();

        if block.previous_digest() != self.latest_block().digest() {
            return Err(LedgerError::BrokenLink { index });
        }

        if !block.verify_digest() {
            return Err(LedgerError::DigestMismatch { index });
        }

        if !block.meets_difficulty(self.config.difficulty) {
            return Err(LedgerError::InsufficientWork {
                index,
                difficulty: self.config.difficulty,
            });
        }

        self.push(block.clone());
        Ok(block)
    }

    fn push(&mut self, block: Block) {
        info!(
            "Block {} appended (nonce {}): {}",
            self.blocks.len(),
            block.nonce(),
            block.digest()
        );
        self.blocks.push(block);
    }

    /// Validate the entire chain
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Validate the entire chain, reporting the first broken block
    ///
    /// The genesis block is never checked on its own; every later block must
    /// link to its predecessor and hash to its stored digest.
    pub fn verify(&self) -> Result<(), LedgerError> {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = i + 1;

            // Check previous digest link
            if current.previous_digest() != previous.digest() {
                warn!("Validation failed: block {} has a broken link", index);
                return Err(LedgerError::BrokenLink { index });
            }

            // Verify block digest
            if !current.verify_digest() {
                warn!("Validation failed: block {} digest mismatch", index);
                return Err(LedgerError::DigestMismatch { index });
            }
        }

        Ok(())
    }

    /// Copy of this ledger with the block at `index` swapped for `block`
    ///
    /// Used to simulate tampering without touching the committed chain.
    pub fn with_block_replaced(&self, index: usize, block: Block) -> Result<Self, LedgerError> {
        if index >= self.blocks.len() {
            return Err(LedgerError::BlockNotFound(index));
        }

        let mut copy = self.clone();
        copy.blocks[index] = block;
        Ok(copy)
    }

    /// Get chain statistics
    pub fn stats(&self) -> ChainStats {
        let payload_bytes: usize = self.blocks.iter().map(|b| b.payload().len()).sum();

        ChainStats {
            height: self.height(),
            total_blocks: self.blocks.len() as u64,
            payload_bytes: payload_bytes as u64,
            difficulty: self.config.difficulty,
            latest_digest: self.latest_block().digest().to_string(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::with_config(LedgerConfig::default())
    }
}
