//! Text normalization and the content-hashing port.
//!
//! Deduplication keys are computed over *normalized* text so that two
//! captures of the same utterance with different casing or whitespace
//! collide on the same `(user_id, source_id, text_hash)` key. The stored
//! `text_content` keeps the caller's original form.

/// Normalize text for dedup hashing: trim, collapse internal whitespace
/// runs to single spaces, lowercase.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trait for computing content hashes over normalized text.
///
/// Implementations live in memoir-infra (SHA-256 via the `sha2` crate).
pub trait TextHasher: Send + Sync {
    /// Compute a lowercase hex digest of `content`.
    ///
    /// Callers are expected to pass already-normalized text; see
    /// [`normalize_text`].
    fn compute_hash(&self, content: &str) -> String;
}
