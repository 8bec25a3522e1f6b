//! SHA-256 content hashing for memory deduplication keys.
//!
//! Implements the `TextHasher` trait from `memoir-core` using the `sha2`
//! crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use memoir_core::hash::TextHasher;

/// SHA-256 implementation of `TextHasher`.
///
/// Computes lowercase hex-encoded SHA-256 digests of normalized text.
pub struct Sha256TextHasher;

impl Sha256TextHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256TextHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl TextHasher for Sha256TextHasher {
    fn compute_hash(&self, content: &str) -> String {
        let digest = Sha256::digest(content.as_bytes());
        format!("{:x}", digest)
    }
}
