//! Promise pattern tracking.

use uuid::Uuid;

use memoir_types::analytics::{PromiseAnalysis, PromiseTypeStats, Trend};
use memoir_types::error::RepositoryError;
use memoir_types::promise::PromiseStatus;

use std::collections::BTreeMap;

use crate::repository::promise::PromiseRepository;

use super::trend::{success_percent, windowed_trend};

const PROMISE_SCAN_LIMIT: usize = 100;
const TREND_WINDOW: usize = 20;
const MAX_FAILURE_REASONS: usize = 5;
const MAX_RECOMMENDATIONS: usize = 5;

/// Analyzes promise-keeping over a user's recent history.
pub struct PromiseAnalyzer<P> {
    promises: P,
}

impl<P> PromiseAnalyzer<P>
where
    P: PromiseRepository,
{
    pub fn new(promises: P) -> Self {
        Self { promises }
    }

    /// Analyze the user's most recent promises. A user with no promise
    /// history gets the documented empty result, never an error.
    #[tracing::instrument(name = "analyze_promises", skip(self), fields(user_id = %user_id))]
    pub async fn analyze(&self, user_id: &Uuid) -> Result<PromiseAnalysis, RepositoryError> {
        let promises = self
            .promises
            .recent_promises(user_id, PROMISE_SCAN_LIMIT)
            .await?;
        if promises.is_empty() {
            return Ok(PromiseAnalysis::empty());
        }

        let kept = promises
            .iter()
            .filter(|p| p.status == PromiseStatus::Kept)
            .count();
        let success_rate = success_percent(kept, promises.len());

        let outcomes: Vec<bool> = promises
            .iter()
            .map(|p| p.status == PromiseStatus::Kept)
            .collect();
        let recent_trend = windowed_trend(&outcomes, TREND_WINDOW);

        let mut breakdown: BTreeMap<String, PromiseTypeStats> = BTreeMap::new();
        for promise in &promises {
            let category = promise
                .category
                .clone()
                .unwrap_or_else(|| "general".to_string());
            let stats = breakdown.entry(category).or_default();
            stats.total += 1;
            match promise.status {
                PromiseStatus::Kept => stats.kept += 1,
                PromiseStatus::Broken => stats.broken += 1,
                PromiseStatus::Pending => {}
            }
        }

        let common_failure_reasons: Vec<String> = promises
            .iter()
            .filter(|p| p.status == PromiseStatus::Broken)
            .filter_map(|p| p.excuse_text.clone())
            .take(MAX_FAILURE_REASONS)
            .collect();

        let mut recommendations = Vec::new();
        if success_rate < 60 {
            recommendations.push("Focus on making smaller, more achievable promises".to_string());
        }
        if recent_trend == Trend::Declining {
            recommendations.push(
                "Recent promise-keeping is declining - consider reducing promise difficulty"
                    .to_string(),
            );
        }
        recommendations.truncate(MAX_RECOMMENDATIONS);

        Ok(PromiseAnalysis {
            total_promises: promises.len(),
            success_rate,
            recent_trend,
            breakdown,
            common_failure_reasons,
            recommendations,
        })
    }
}
