//! Read-only memory insight computation.
//!
//! Produces processed statistics instead of raw psychological content: the
//! consumer sees counts, trend labels, and a health score, never the stored
//! text.

use chrono::{DateTime, Duration, Utc};

use memoir_types::insights::{
    AccountabilitySignals, BehavioralIndicators, EmotionalTrend, ExcuseFrequency, MemoryInsights,
    MemoryStats, PatternStrength, SystemHealth, VolumeTrend,
};
use memoir_types::memory::{content_type, MemoryRecord};

use std::collections::BTreeMap;

const POSITIVE_TYPES: &[&str] = &[
    content_type::BREAKTHROUGH,
    content_type::VISION,
    content_type::COMMITMENT,
    content_type::SACRED_OATH,
];

const NEGATIVE_TYPES: &[&str] = &[
    content_type::EXCUSE,
    content_type::EXCUSE_PATTERN,
    content_type::SELF_DECEPTION,
];

/// Compute the insight aggregate over a user's records.
///
/// `records` must be ordered newest first (as the repository returns them);
/// `now` is injected for testability.
pub fn compute_insights(records: &[MemoryRecord], now: DateTime<Utc>) -> MemoryInsights {
    let seven_days_ago = now - Duration::days(7);
    let fourteen_days_ago = now - Duration::days(14);

    let total = records.len();
    let recent = records
        .iter()
        .filter(|r| r.created_at > seven_days_ago)
        .count();
    let previous_week = records
        .iter()
        .filter(|r| r.created_at > fourteen_days_ago && r.created_at <= seven_days_ago)
        .count();

    let mut breakdown: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *breakdown.entry(record.content_type.clone()).or_insert(0) += 1;
    }

    let weekly_trend = if recent as f64 > previous_week as f64 * 1.2 {
        VolumeTrend::Increasing
    } else if (recent as f64) < previous_week as f64 * 0.8 {
        VolumeTrend::Decreasing
    } else {
        VolumeTrend::Stable
    };

    let count_of = |t: &str| breakdown.get(t).copied().unwrap_or(0);
    let excuse_count = count_of(content_type::EXCUSE);
    let breakthrough_count = count_of(content_type::BREAKTHROUGH);
    let pattern_count = count_of(content_type::PATTERN);

    let excuse_frequency = if excuse_count > 10 {
        ExcuseFrequency::High
    } else if excuse_count > 3 {
        ExcuseFrequency::Moderate
    } else {
        ExcuseFrequency::Low
    };

    let pattern_strength = if pattern_count > 15 {
        PatternStrength::Strong
    } else if pattern_count > 5 {
        PatternStrength::Moderate
    } else {
        PatternStrength::Weak
    };

    let positive: u64 = POSITIVE_TYPES.iter().map(|t| count_of(t)).sum();
    let negative: u64 = NEGATIVE_TYPES.iter().map(|t| count_of(t)).sum();
    let emotional_trend = if positive as f64 > negative as f64 * 1.5 {
        EmotionalTrend::Positive
    } else if negative as f64 > positive as f64 * 1.5 {
        EmotionalTrend::Negative
    } else {
        EmotionalTrend::Neutral
    };

    let critical_themes_count = breakdown.len();
    let growth_indicators = breakthrough_count + count_of(content_type::VISION);
    let data_quality_score = (total as i64 * 10 + critical_themes_count as i64 * 15
        - excuse_count as i64 * 2)
        .clamp(0, 100) as u32;

    MemoryInsights {
        memory_stats: MemoryStats {
            total_memories: total,
            recent_memories: recent,
            content_type_breakdown: breakdown,
            weekly_trend,
        },
        behavioral_indicators: BehavioralIndicators {
            excuse_frequency,
            breakthrough_moments: breakthrough_count,
            pattern_strength,
            emotional_trend,
        },
        accountability_signals: AccountabilitySignals {
            recurring_pattern_count: excuse_count.max(pattern_count),
            last_memory_date: records.first().map(|r| r.created_at),
            critical_themes_count,
            growth_indicators,
        },
        system_health: SystemHealth {
            memory_system_active: total > 0,
            last_processed_at: now,
            data_quality_score,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_types::memory::MemoryMetadata;
    use uuid::Uuid;

    fn record(content_type: &str, age_days: i64, now: DateTime<Utc>) -> MemoryRecord {
        MemoryRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            source_id: "src".to_string(),
            content_type: content_type.to_string(),
            text_content: "text".to_string(),
            embedding: vec![],
            metadata: MemoryMetadata::default(),
            created_at: now - Duration::days(age_days),
        }
    }

    #[test]
    fn test_empty_history_insights() {
        let now = Utc::now();
        let insights = compute_insights(&[], now);
        assert_eq!(insights.memory_stats.total_memories, 0);
        assert_eq!(insights.memory_stats.weekly_trend, VolumeTrend::Stable);
        assert!(!insights.system_health.memory_system_active);
        assert_eq!(insights.system_health.data_quality_score, 0);
        assert!(insights.accountability_signals.last_memory_date.is_none());
    }

    #[test]
    fn test_excuse_frequency_thresholds() {
        let now = Utc::now();
        let records: Vec<_> = (0..11)
            .map(|_| record(content_type::EXCUSE, 1, now))
            .collect();
        let insights = compute_insights(&records, now);
        assert_eq!(
            insights.behavioral_indicators.excuse_frequency,
            ExcuseFrequency::High
        );

        let insights = compute_insights(&records[..4], now);
        assert_eq!(
            insights.behavioral_indicators.excuse_frequency,
            ExcuseFrequency::Moderate
        );

        let insights = compute_insights(&records[..3], now);
        assert_eq!(
            insights.behavioral_indicators.excuse_frequency,
            ExcuseFrequency::Low
        );
    }

    #[test]
    fn test_weekly_trend_increasing() {
        let now = Utc::now();
        let mut records = Vec::new();
        // 5 in the last week, 2 the week before.
        for _ in 0..5 {
            records.push(record(content_type::PATTERN, 2, now));
        }
        for _ in 0..2 {
            records.push(record(content_type::PATTERN, 10, now));
        }
        let insights = compute_insights(&records, now);
        assert_eq!(insights.memory_stats.weekly_trend, VolumeTrend::Increasing);
    }

    #[test]
    fn test_emotional_trend_positive() {
        let now = Utc::now();
        let mut records = Vec::new();
        for _ in 0..4 {
            records.push(record(content_type::BREAKTHROUGH, 1, now));
        }
        records.push(record(content_type::EXCUSE, 1, now));
        let insights = compute_insights(&records, now);
        assert_eq!(
            insights.behavioral_indicators.emotional_trend,
            EmotionalTrend::Positive
        );
        assert_eq!(insights.accountability_signals.growth_indicators, 4);
    }

    #[test]
    fn test_data_quality_score_clamped() {
        let now = Utc::now();
        let records: Vec<_> = (0..50)
            .map(|_| record(content_type::COMMITMENT, 1, now))
            .collect();
        let insights = compute_insights(&records, now);
        assert_eq!(insights.system_health.data_quality_score, 100);
    }
}
