//! Block implementation for the ledger
//!
//! A block carries an opaque payload bound to its predecessor by digest
//! and to a proof-of-work nonce.

use crate::crypto::{hash, hash_parts, meets_difficulty, Digest};
use serde::{Deserialize, Serialize};

/// Payload of the genesis block
pub const GENESIS_PAYLOAD: &str = "gen-data";

/// Seed hashed into the genesis block's own digest
pub const GENESIS_SEED: &str = "gen_hash";

/// Seed hashed into the genesis block's previous digest
pub const SENTINEL_SEED: &str = "gen_last";

/// A block in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Opaque caller data
    payload: Vec<u8>,
    /// Digest over `payload ‖ previous_digest ‖ nonce`
    digest: Digest,
    /// Digest of the preceding block
    previous_digest: Digest,
    /// Nonce found by mining
    nonce: u64,
}

impl Block {
    /// Create a block whose digest is computed from its content
    pub fn new(payload: Vec<u8>, previous_digest: Digest, nonce: u64) -> Self {
        let digest = Self::calculate_digest(&payload, &previous_digest, nonce);
        Self {
            payload,
            digest,
            previous_digest,
            nonce,
        }
    }

    /// Assemble a block from already-computed parts without rehashing
    pub(crate) fn from_parts(
        payload: Vec<u8>,
        digest: Digest,
        previous_digest: Digest,
        nonce: u64,
    ) -> Self {
        Self {
            payload,
            digest,
            previous_digest,
            nonce,
        }
    }

    /// Create the genesis block
    ///
    /// The genesis digest and previous digest are hashes of fixed seeds, not
    /// of the block's content, and the block is never mined.
    pub fn genesis() -> Self {
        Self {
            payload: GENESIS_PAYLOAD.as_bytes().to_vec(),
            digest: hash(GENESIS_SEED),
            previous_digest: hash(SENTINEL_SEED),
            nonce: 0,
        }
    }

    /// Digest of the canonical content `payload ‖ previous_digest ‖ nonce`
    pub fn calculate_digest(payload: &[u8], previous_digest: &str, nonce: u64) -> Digest {
        hash_parts(&[
            payload,
            previous_digest.as_bytes(),
            nonce.to_string().as_bytes(),
        ])
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text, if it is valid UTF-8
    pub fn payload_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn previous_digest(&self) -> &str {
        &self.previous_digest
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Verify the stored digest against the block content
    pub fn verify_digest(&self) -> bool {
        self.digest == Self::calculate_digest(&self.payload, &self.previous_digest, self.nonce)
    }

    /// Check if the digest meets the difficulty target
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_difficulty(&self.digest, difficulty)
    }

    // =========================================================================
    // Altered copies (tamper simulation)
    // =========================================================================

    /// Copy of this block with a different payload and the old digest
    pub fn with_payload(&self, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            ..self.clone()
        }
    }

    /// Copy of this block with a different nonce and the old digest
    pub fn with_nonce(&self, nonce: u64) -> Self {
        Self {
            nonce,
            ..self.clone()
        }
    }

    /// Copy of this block with a different previous digest and the old digest
    pub fn with_previous_digest(&self, previous_digest: impl Into<Digest>) -> Self {
        Self {
            previous_digest: previous_digest.into(),
            ..self.clone()
        }
    }

    /// Copy of this block with a different stored digest
    pub fn with_digest(&self, digest: impl Into<Digest>) -> Self {
        Self {
            digest: digest.into(),
            ..self.clone()
        }
    }
}
