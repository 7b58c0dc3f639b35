//! Cryptographic utilities for the ledger
//!
//! This module provides:
//! - SHA-256 hashing
//! - Proof-of-work target checks

pub mod hash;

pub use hash::{
    hash, hash_parts, leading_zeros, meets_difficulty, sha256, sha256_hex, Digest,
    DIGEST_HEX_LEN,
};
