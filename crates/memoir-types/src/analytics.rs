//! Behavioral analytics result types.
//!
//! These are the read-only analysis outputs: call-success trends, promise
//! patterns, and identity-vs-call correlation. Every analysis has a
//! documented "empty history" shape instead of an error path.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Direction of a success-rate trend across two time windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "improving" => Ok(Trend::Improving),
            "declining" => Ok(Trend::Declining),
            "stable" => Ok(Trend::Stable),
            other => Err(format!("invalid trend: '{other}'")),
        }
    }
}

/// Call-success analysis over the user's most recent calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallAnalysis {
    pub total_calls: usize,
    /// Rounded percentage of successful calls (0-100).
    pub success_rate: u32,
    pub recent_trend: Trend,
    /// Mean call duration in seconds across the analyzed window.
    pub average_call_duration: i64,
    /// Tone with the highest per-tone success ratio.
    pub most_effective_tone: String,
    pub recommended_actions: Vec<String>,
}

impl CallAnalysis {
    /// The documented result for a user with zero call history.
    pub fn empty() -> Self {
        Self {
            total_calls: 0,
            success_rate: 0,
            recent_trend: Trend::Stable,
            average_call_duration: 0,
            most_effective_tone: "supportive".to_string(),
            recommended_actions: vec!["Schedule first accountability call".to_string()],
        }
    }
}

/// Kept/broken breakdown for one promise category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromiseTypeStats {
    pub total: u64,
    pub kept: u64,
    pub broken: u64,
}

/// Promise-keeping analysis over the user's most recent promises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromiseAnalysis {
    pub total_promises: usize,
    /// Rounded percentage of kept promises (0-100).
    pub success_rate: u32,
    pub recent_trend: Trend,
    /// Per-category breakdown, keyed by category ("general" when unset).
    pub breakdown: BTreeMap<String, PromiseTypeStats>,
    /// Excuse texts from recently broken promises, most recent first.
    pub common_failure_reasons: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PromiseAnalysis {
    /// The documented result for a user with zero promise history.
    pub fn empty() -> Self {
        Self {
            total_promises: 0,
            success_rate: 0,
            recent_trend: Trend::Stable,
            breakdown: BTreeMap::new(),
            common_failure_reasons: Vec::new(),
            recommendations: vec![
                "Start making daily commitments to build accountability".to_string(),
            ],
        }
    }
}

/// Identity-vs-call consistency and evolution report.
///
/// The consistency score and contradiction detection are pending a real
/// scoring specification; until then they are reported as unavailable
/// rather than computed from placeholder heuristics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityCorrelation {
    /// Consistency score (0-100). `None` until a scoring formula is
    /// specified -- see `pending_analyses`.
    pub consistency_score: Option<u32>,
    /// Areas where call evidence matches the stated identity baseline.
    pub consistent_areas: Vec<String>,
    /// Breakthrough snippets observed in calls (growth evidence).
    pub growth_indicators: Vec<String>,
    /// High-confidence snippets seen only in calls, absent from identity.
    pub call_only_insights: Vec<String>,
    /// Contradictions between identity and call behavior. Empty until the
    /// detection algorithm is specified.
    pub contradictions: Vec<String>,
    /// Analyses that are not yet available pending a concrete algorithm.
    pub pending_analyses: Vec<String>,
    pub recommendations: Vec<String>,
}
