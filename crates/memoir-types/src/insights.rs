//! Memory insights: processed statistics exposed instead of raw memories.
//!
//! Downstream consumers (prompt builders, dashboards) get counts, trend
//! labels, and health indicators -- never the stored psychological text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// Week-over-week memory volume direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// How often excuse-type memories occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcuseFrequency {
    High,
    Moderate,
    Low,
}

/// How entrenched recurring behavioral patterns are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStrength {
    Strong,
    Moderate,
    Weak,
}

/// Whether positive or negative content types dominate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalTrend {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memories: usize,
    /// Records created within the last 7 days.
    pub recent_memories: usize,
    pub content_type_breakdown: BTreeMap<String, u64>,
    pub weekly_trend: VolumeTrend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralIndicators {
    pub excuse_frequency: ExcuseFrequency,
    pub breakthrough_moments: u64,
    pub pattern_strength: PatternStrength,
    pub emotional_trend: EmotionalTrend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountabilitySignals {
    /// `max(excuse count, pattern count)`.
    pub recurring_pattern_count: u64,
    pub last_memory_date: Option<DateTime<Utc>>,
    /// Number of distinct content types present.
    pub critical_themes_count: usize,
    /// Breakthrough count plus vision count.
    pub growth_indicators: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    pub memory_system_active: bool,
    pub last_processed_at: DateTime<Utc>,
    /// `clamp(total*10 + themes*15 - excuses*2, 0, 100)`.
    pub data_quality_score: u32,
}

/// The read-only insight aggregate for one user's memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryInsights {
    pub memory_stats: MemoryStats,
    pub behavioral_indicators: BehavioralIndicators,
    pub accountability_signals: AccountabilitySignals,
    pub system_health: SystemHealth,
}
