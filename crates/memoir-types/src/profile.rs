//! Pattern profile types.
//!
//! The nightly aggregator produces one [`PatternProfile`] per user and fully
//! replaces the previous one on every run -- this subsystem keeps no profile
//! history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// Maximum number of emerging patterns kept per profile.
pub const MAX_EMERGING_PATTERNS: usize = 5;

/// A recurring text fingerprint whose frequency grew sharply in the last
/// 7 days versus the prior 21-day baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergingPattern {
    /// Dedup key: the record's text hash, or its normalized text.
    pub key: String,
    /// First 160 characters of one matching record, for human display.
    pub sample_text: String,
    pub recent_count: u64,
    pub baseline_count: u64,
    /// Laplace-smoothed growth ratio `(recent + 1) / (baseline + 1)`,
    /// rounded to two decimals.
    pub growth_factor: f64,
}

/// Headline counts for the three most-watched content types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub top_excuses: u64,
    pub top_breakthroughs: u64,
    pub top_patterns: u64,
}

/// Per-user nightly behavioral summary. Upserted as a whole; the previous
/// profile is discarded on each run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternProfile {
    /// content_type -> count over the scan window.
    pub counts_by_type: BTreeMap<String, u64>,
    /// Most frequent emotion/tone label across records carrying one.
    pub dominant_emotion: Option<String>,
    pub summary: ProfileSummary,
    /// Ordered by `growth_factor` descending, at most
    /// [`MAX_EMERGING_PATTERNS`] entries.
    pub emerging_patterns: Vec<EmergingPattern>,
    pub updated_at: DateTime<Utc>,
}
