//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 digest used for block digests and the
//! leading-zero check used for proof of work.

use sha2::{Digest as _, Sha256};

/// Hex-encoded SHA-256 digest
pub type Digest = String;

/// Length of a hex-encoded digest (256 bits)
pub const DIGEST_HEX_LEN: usize = 64;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Hashes arbitrary content into a 64 character lowercase hex digest
pub fn hash(content: impl AsRef<[u8]>) -> Digest {
    sha256_hex(content.as_ref())
}

/// Hashes several byte slices as if they were one concatenated input
pub fn hash_parts(parts: &[&[u8]]) -> Digest {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Checks if a hex digest meets the difficulty target
/// The digest must start with `difficulty` `'0'` characters
pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    let required = difficulty as usize;
    if required > digest.len() {
        return false;
    }

    digest.as_bytes()[..required].iter().all(|c| *c == b'0')
}

/// Counts the leading `'0'` characters of a hex digest
pub fn leading_zeros(digest: &str) -> usize {
    digest.bytes().take_while(|c| *c == b'0').count()
}
