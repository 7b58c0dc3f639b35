//! Mining engine for the ledger
//!
//! Searches nonces `0, 1, 2, …` in order until a block digest meets the
//! difficulty target.

use crate::core::Block;
use crate::crypto::{meets_difficulty, Digest};
use log::{debug, info, warn};
use sha2::{Digest as _, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Mining errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    #[error("No valid nonce found within {attempts} attempts")]
    Exhausted { attempts: u64 },
    #[error("Mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
    #[error("Mining worker failed: {0}")]
    Worker(String),
}

/// Mining statistics
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Number of hash attempts
    pub hash_attempts: u64,
    /// Time taken in milliseconds
    pub time_ms: u128,
    /// Hash rate (hashes per second)
    pub hash_rate: f64,
}

impl MiningStats {
    fn new(attempts: u64, start: Instant) -> Self {
        let elapsed = start.elapsed().as_millis();
        let hash_rate = if elapsed > 0 {
            (attempts as f64) / (elapsed as f64 / 1000.0)
        } else {
            attempts as f64
        };

        Self {
            hash_attempts: attempts,
            time_ms: elapsed,
            hash_rate,
        }
    }
}

/// Cooperative cancellation flag shared with a running miner
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every miner holding a clone of this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Miner for sealing payloads into blocks
#[derive(Debug, Clone)]
pub struct Miner {
    /// Required leading zero hex characters
    pub difficulty: u32,
    /// Upper bound on nonces tried by `try_mine`, `None` for unbounded
    pub max_attempts: Option<u64>,
}

impl Miner {
    /// Create a new unbounded miner
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            max_attempts: None,
        }
    }

    /// Create a miner that gives up after `max_attempts` nonces
    pub fn with_max_attempts(difficulty: u32, max_attempts: u64) -> Self {
        Self {
            difficulty,
            max_attempts: Some(max_attempts),
        }
    }

    /// Mine a block on top of `previous_digest`, searching without bound
    pub fn mine(&self, payload: &[u8], previous_digest: &str) -> (Block, MiningStats) {
        let unbounded = Self {
            max_attempts: None,
            ..self.clone()
        };

        match unbounded.search(payload, previous_digest, None) {
            Ok(result) => result,
            // Only reachable once every u64 nonce has been tried
            Err(_) => {
                let block = Block::new(payload.to_vec(), previous_digest.to_string(), u64::MAX);
                (block, MiningStats::new(u64::MAX, Instant::now()))
            }
        }
    }

    /// Mine a block, stopping at `max_attempts` or when `cancel` fires
    pub fn try_mine(
        &self,
        payload: &[u8],
        previous_digest: &str,
        cancel: &CancelToken,
    ) -> Result<(Block, MiningStats), MiningError> {
        self.search(payload, previous_digest, Some(cancel))
    }

    /// Mine on the tokio blocking pool so the caller can await, cancel or time out
    pub async fn mine_background(
        &self,
        payload: Vec<u8>,
        previous_digest: Digest,
        cancel: CancelToken,
    ) -> Result<(Block, MiningStats), MiningError> {
        let miner = self.clone();
        tokio::task::spawn_blocking(move || miner.try_mine(&payload, &previous_digest, &cancel))
            .await
            .map_err(|e| MiningError::Worker(e.to_string()))?
    }

    fn search(
        &self,
        payload: &[u8],
        previous_digest: &str,
        cancel: Option<&CancelToken>,
    ) -> Result<(Block, MiningStats), MiningError> {
        let start = Instant::now();

        debug!(
            "Mining {} byte payload with difficulty {}...",
            payload.len(),
            self.difficulty
        );

        // payload ‖ previous_digest is shared by every attempt
        let mut prefix = Sha256::new();
        prefix.update(payload);
        prefix.update(previous_digest.as_bytes());

        let mut nonce = 0u64;
        loop {
            if let Some(limit) = self.max_attempts {
                if nonce >= limit {
                    warn!("Mining gave up after {} attempts", nonce);
                    return Err(MiningError::Exhausted { attempts: nonce });
                }
            }
            if cancel.is_some_and(CancelToken::is_cancelled) {
                warn!("Mining cancelled after {} attempts", nonce);
                return Err(MiningError::Cancelled { attempts: nonce });
            }

            let mut hasher = prefix.clone();
            hasher.update(nonce.to_string().as_bytes());
            let candidate = hex::encode(hasher.finalize());

            if meets_difficulty(&candidate, self.difficulty) {
                let attempts = nonce + 1;
                let stats = MiningStats::new(attempts, start);
                info!(
                    "Block mined in {}ms ({} attempts, {:.2} H/s): {}",
                    stats.time_ms, attempts, stats.hash_rate, candidate
                );

                let block = Block::from_parts(
                    payload.to_vec(),
                    candidate,
                    previous_digest.to_string(),
                    nonce,
                );
                return Ok((block, stats));
            }

            nonce = match nonce.checked_add(1) {
                Some(next) => next,
                None => return Err(MiningError::Exhausted { attempts: u64::MAX }),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash;
    use std::time::Duration;

    #[test]
    fn test_miner() {
        let miner = Miner::new(2);
        let (block, stats) = miner.mine(b"data", &hash("prev"));

        assert!(block.meets_difficulty(2));
        assert!(block.verify_digest());
        assert_eq!(block.previous_digest(), hash("prev"));
        assert_eq!(stats.hash_attempts, block.nonce() + 1);
    }

    #[test]
    fn test_first_valid_nonce_is_taken() {
        let miner = Miner::new(1);
        let prev = hash("prev");
        let (block, _) = miner.mine(b"data", &prev);

        for nonce in 0..block.nonce() {
            let digest = Block::calculate_digest(b"data", &prev, nonce);
            assert!(!meets_difficulty(&digest, 1));
        }
    }

    #[test]
    fn test_zero_difficulty_accepts_first_nonce() {
        let miner = Miner::new(0);
        let (block, stats) = miner.mine(b"anything", &hash("prev"));

        assert_eq!(block.nonce(), 0);
        assert_eq!(stats.hash_attempts, 1);
    }

    #[test]
    fn test_max_attempts_exhausted() {
        // 64 leading zeros is out of reach
        let miner = Miner::with_max_attempts(64, 50);
        let result = miner.try_mine(b"data", &hash("prev"), &CancelToken::new());

        assert_eq!(result.unwrap_err(), MiningError::Exhausted { attempts: 50 });
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = Miner::new(1).try_mine(b"data", &hash("prev"), &cancel);
        assert_eq!(result.unwrap_err(), MiningError::Cancelled { attempts: 0 });
    }

    #[test]
    fn test_bounded_miner_succeeds_within_limit() {
        let miner = Miner::with_max_attempts(0, 1);
        let (block, _) = miner
            .try_mine(b"data", &hash("prev"), &CancelToken::new())
            .unwrap();
        assert_eq!(block.nonce(), 0);
    }

    #[tokio::test]
    async fn test_mine_background() {
        let miner = Miner::new(2);
        let (block, _) = miner
            .mine_background(b"data".to_vec(), hash("prev"), CancelToken::new())
            .await
            .unwrap();

        assert!(block.meets_difficulty(2));
        assert!(block.verify_digest());
    }

    #[tokio::test]
    async fn test_mine_background_cancel() {
        let miner = Miner::new(64);
        let cancel = CancelToken::new();

        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                miner
                    .mine_background(b"data".to_vec(), hash("prev"), cancel)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(MiningError::Cancelled { .. })));
    }
}
