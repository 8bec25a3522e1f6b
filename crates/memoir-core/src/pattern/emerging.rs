//! Emerging-pattern detection.
//!
//! Flags text fingerprints of excuse/pattern records whose frequency in the
//! last 7 days grew sharply against the prior 21-day baseline. Laplace
//! smoothing (`(recent + 1) / (baseline + 1)`) avoids division by zero and
//! dampens noise from single occurrences.

use chrono::{DateTime, Duration, Utc};

use memoir_types::memory::{content_type, MemoryRecord};
use memoir_types::profile::{EmergingPattern, MAX_EMERGING_PATTERNS};

use std::collections::HashMap;

use crate::hash::normalize_text;

const SAMPLE_TEXT_MAX_CHARS: usize = 160;

/// Minimum recent occurrences for a key to qualify.
const MIN_RECENT_COUNT: u64 = 3;
/// Maximum baseline occurrences -- more than this means the pattern is
/// established, not emerging.
const MAX_BASELINE_COUNT: u64 = 1;
/// Minimum smoothed growth ratio.
const MIN_GROWTH_FACTOR: f64 = 2.0;

/// Detect emerging patterns across a user's records.
///
/// Only `excuse` and `pattern` records participate. `now` is injected for
/// testability.
pub fn detect_emerging(records: &[MemoryRecord], now: DateTime<Utc>) -> Vec<EmergingPattern> {
    let recent_cutoff = now - Duration::days(7);
    let baseline_cutoff = now - Duration::days(28);

    struct KeyStats {
        recent: u64,
        baseline: u64,
        sample_text: String,
    }

    let mut stats: HashMap<String, KeyStats> = HashMap::new();

    for record in records {
        if record.content_type != content_type::EXCUSE
            && record.content_type != content_type::PATTERN
        {
            continue;
        }

        let key = if record.metadata.text_hash.is_empty() {
            normalize_text(&record.text_content)
        } else {
            record.metadata.text_hash.clone()
        };
        if key.is_empty() {
            continue;
        }

        let in_recent = record.created_at > recent_cutoff && record.created_at <= now;
        let in_baseline =
            record.created_at > baseline_cutoff && record.created_at <= recent_cutoff;
        if !in_recent && !in_baseline {
            continue;
        }

        let entry = stats.entry(key).or_insert_with(|| KeyStats {
            recent: 0,
            baseline: 0,
            sample_text: truncate_chars(&record.text_content, SAMPLE_TEXT_MAX_CHARS),
        });
        if in_recent {
            entry.recent += 1;
        } else {
            entry.baseline += 1;
        }
    }

    let mut patterns: Vec<EmergingPattern> = stats
        .into_iter()
        .filter_map(|(key, s)| {
            if s.recent == 0 {
                return None;
            }
            let growth = (s.recent as f64 + 1.0) / (s.baseline as f64 + 1.0);
            let growth = (growth * 100.0).round() / 100.0;
            if s.recent >= MIN_RECENT_COUNT
                && s.baseline <= MAX_BASELINE_COUNT
                && growth >= MIN_GROWTH_FACTOR
            {
                Some(EmergingPattern {
                    key,
                    sample_text: s.sample_text,
                    recent_count: s.recent,
                    baseline_count: s.baseline,
                    growth_factor: growth,
                })
            } else {
                None
            }
        })
        .collect();

    patterns.sort_by(|a, b| b.growth_factor.total_cmp(&a.growth_factor));
    patterns.truncate(MAX_EMERGING_PATTERNS);
    patterns
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_types::memory::MemoryMetadata;
    use uuid::Uuid;

    fn record(content_type: &str, text: &str, hash: &str, age_days: i64, now: DateTime<Utc>) -> MemoryRecord {
        MemoryRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            source_id: "src".to_string(),
            content_type: content_type.to_string(),
            text_content: text.to_string(),
            embedding: vec![],
            metadata: MemoryMetadata {
                text_hash: hash.to_string(),
                ..Default::default()
            },
            created_at: now - Duration::days(age_days),
        }
    }

    #[test]
    fn test_four_recent_zero_baseline_emerges_with_growth_five() {
        let now = Utc::now();
        let records: Vec<_> = (0..4)
            .map(|_| record(content_type::EXCUSE, "I was too busy", "k", 1, now))
            .collect();

        let patterns = detect_emerging(&records, now);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].key, "k");
        assert_eq!(patterns[0].recent_count, 4);
        assert_eq!(patterns[0].baseline_count, 0);
        assert_eq!(patterns[0].growth_factor, 5.0);
    }

    #[test]
    fn test_two_recent_occurrences_excluded() {
        let now = Utc::now();
        let records: Vec<_> = (0..2)
            .map(|_| record(content_type::EXCUSE, "I was too busy", "k", 1, now))
            .collect();
        assert!(detect_emerging(&records, now).is_empty());
    }

    #[test]
    fn test_established_pattern_excluded_by_baseline() {
        let now = Utc::now();
        let mut records: Vec<_> = (0..4)
            .map(|_| record(content_type::PATTERN, "evening slips", "k", 1, now))
            .collect();
        for _ in 0..3 {
            records.push(record(content_type::PATTERN, "evening slips", "k", 14, now));
        }
        // baseline_count = 3 > 1: established, not emerging.
        assert!(detect_emerging(&records, now).is_empty());
    }

    #[test]
    fn test_non_excuse_pattern_types_ignored() {
        let now = Utc::now();
        let records: Vec<_> = (0..5)
            .map(|_| record(content_type::BREAKTHROUGH, "I did it", "k", 1, now))
            .collect();
        assert!(detect_emerging(&records, now).is_empty());
    }

    #[test]
    fn test_falls_back_to_normalized_text_key() {
        let now = Utc::now();
        let records: Vec<_> = (0..3)
            .map(|_| record(content_type::EXCUSE, "Too  TIRED tonight", "", 2, now))
            .collect();
        let patterns = detect_emerging(&records, now);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].key, "too tired tonight");
    }

    #[test]
    fn test_top_five_by_growth() {
        let now = Utc::now();
        let mut records = Vec::new();
        for i in 0..7 {
            // key i has 3 + i recent occurrences, so growth rises with i.
            for _ in 0..(3 + i) {
                records.push(record(
                    content_type::EXCUSE,
                    &format!("excuse {i}"),
                    &format!("k{i}"),
                    1,
                    now,
                ));
            }
        }
        let patterns = detect_emerging(&records, now);
        assert_eq!(patterns.len(), MAX_EMERGING_PATTERNS);
        // Highest-growth key first.
        assert_eq!(patterns[0].key, "k6");
        for pair in patterns.windows(2) {
            assert!(pair[0].growth_factor >= pair[1].growth_factor);
        }
    }

    #[test]
    fn test_sample_text_truncated_to_160_chars() {
        let now = Utc::now();
        let long_text = "x".repeat(400);
        let records: Vec<_> = (0..3)
            .map(|_| record(content_type::EXCUSE, &long_text, "k", 1, now))
            .collect();
        let patterns = detect_emerging(&records, now);
        assert_eq!(patterns[0].sample_text.chars().count(), 160);
    }
}
