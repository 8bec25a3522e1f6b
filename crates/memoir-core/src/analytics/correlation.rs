//! Identity-call correlation.
//!
//! Correlates the onboarding identity baseline with snippets extracted from
//! calls. The original consistency-scoring and contradiction-detection
//! heuristics were placeholders, so those sub-analyses are reported as
//! pending rather than computed; the evidence lists (growth indicators,
//! call-only insights, consistent areas) are real.

use uuid::Uuid;

use memoir_types::analytics::IdentityCorrelation;
use memoir_types::call::CallInsight;
use memoir_types::error::RepositoryError;
use memoir_types::identity::IdentityRecord;
use memoir_types::memory::content_type;

use crate::repository::identity::IdentityRepository;

const SNIPPET_MAX_CHARS: usize = 40;
const MAX_LIST_ENTRIES: usize = 3;
const HIGH_CONFIDENCE: f32 = 0.8;

/// Sub-analyses awaiting a concrete algorithm.
const PENDING_ANALYSES: &[&str] = &["consistency_scoring", "contradiction_detection"];

/// Correlates identity baselines with extracted call insights.
pub struct IdentityCorrelator<I> {
    identity_repo: I,
}

impl<I> IdentityCorrelator<I>
where
    I: IdentityRepository,
{
    pub fn new(identity_repo: I) -> Self {
        Self { identity_repo }
    }

    /// Correlate the user's identity with their extracted call insights.
    ///
    /// Missing identity or empty insight history yields the empty report,
    /// never an error.
    #[tracing::instrument(name = "correlate_identity", skip(self, insights), fields(user_id = %user_id, insight_count = insights.len()))]
    pub async fn analyze(
        &self,
        user_id: &Uuid,
        insights: &[CallInsight],
    ) -> Result<IdentityCorrelation, RepositoryError> {
        let identity = self.identity_repo.get_by_user(user_id).await?;
        Ok(correlate(identity.as_ref(), insights))
    }
}

/// Pure correlation over one identity record and the call insight list.
pub fn correlate(
    identity: Option<&IdentityRecord>,
    insights: &[CallInsight],
) -> IdentityCorrelation {
    let mut report = IdentityCorrelation {
        pending_analyses: PENDING_ANALYSES.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };

    let Some(identity) = identity else {
        return report;
    };
    if insights.is_empty() {
        return report;
    }

    let has_excuses = insights
        .iter()
        .any(|i| i.content_type == content_type::EXCUSE);
    if identity.current_struggle.is_some() && has_excuses {
        report
            .consistent_areas
            .push("Self-awareness patterns match between identity and calls".to_string());
    }

    report.growth_indicators = insights
        .iter()
        .filter(|i| i.content_type == content_type::BREAKTHROUGH)
        .map(|i| truncate_chars(&i.text_content, SNIPPET_MAX_CHARS))
        .take(MAX_LIST_ENTRIES)
        .collect();

    report.call_only_insights = insights
        .iter()
        .filter(|i| i.confidence > HIGH_CONFIDENCE)
        .map(|i| truncate_chars(&i.text_content, SNIPPET_MAX_CHARS))
        .take(MAX_LIST_ENTRIES)
        .collect();

    if !report.growth_indicators.is_empty() {
        report.recommendations.push(
            "Celebrate and reinforce positive behavioral evolution identified in calls"
                .to_string(),
        );
    }

    report
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryIdentityRepository;
    use chrono::Utc;

    fn insight(content_type: &str, text: &str, confidence: f32) -> CallInsight {
        CallInsight {
            call_id: Uuid::now_v7(),
            content_type: content_type.to_string(),
            text_content: text.to_string(),
            confidence,
            call_date: Utc::now(),
            call_success: "success".to_string(),
            call_type: None,
            tone_used: None,
        }
    }

    #[tokio::test]
    async fn test_missing_identity_yields_empty_report() {
        let correlator = IdentityCorrelator::new(InMemoryIdentityRepository::default());
        let report = correlator
            .analyze(&Uuid::now_v7(), &[insight("excuse", "too busy", 0.9)])
            .await
            .unwrap();
        assert!(report.consistency_score.is_none());
        assert!(report.consistent_areas.is_empty());
        assert_eq!(
            report.pending_analyses,
            vec!["consistency_scoring", "contradiction_detection"]
        );
    }

    #[test]
    fn test_growth_and_call_only_lists() {
        let identity = IdentityRecord {
            user_id: Uuid::now_v7(),
            current_struggle: Some("procrastination".to_string()),
            ..Default::default()
        };
        let insights = vec![
            insight("breakthrough", "finally ran before work", 0.95),
            insight("excuse", "too tired", 0.5),
            insight("pattern", "slips on Fridays", 0.85),
        ];

        let report = correlate(Some(&identity), &insights);
        assert_eq!(report.growth_indicators, vec!["finally ran before work"]);
        // confidence > 0.8 only.
        assert_eq!(
            report.call_only_insights,
            vec!["finally ran before work", "slips on Fridays"]
        );
        assert_eq!(report.consistent_areas.len(), 1);
        assert!(!report.recommendations.is_empty());
        assert!(report.consistency_score.is_none());
        assert!(report.contradictions.is_empty());
    }

    #[test]
    fn test_empty_insights_yield_empty_report() {
        let identity = IdentityRecord::default();
        let report = correlate(Some(&identity), &[]);
        assert!(report.growth_indicators.is_empty());
        assert!(report.recommendations.is_empty());
    }
}
