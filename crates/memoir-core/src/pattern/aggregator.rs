//! Nightly pattern aggregation over active users.
//!
//! One profile per user, fully replaced on each run. Users are processed
//! independently: a fetch or upsert failure for one user is recorded in the
//! report and the run continues. Only a failure to list the active users
//! fails the run as a whole.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use memoir_types::error::RepositoryError;
use memoir_types::memory::{content_type, MemoryRecord};
use memoir_types::profile::{PatternProfile, ProfileSummary};

use std::collections::BTreeMap;

use crate::repository::memory::MemoryRepository;
use crate::repository::profile::ProfileRepository;
use crate::repository::user::UserRepository;

/// Records scanned per user per run.
const SCAN_LIMIT: usize = 500;

/// Default cap on users per nightly run.
pub const DEFAULT_USER_CAP: usize = 100;

/// Outcome of one aggregation run.
#[derive(Debug, Default)]
pub struct AggregationReport {
    /// Users whose profile was successfully upserted.
    pub processed: usize,
    /// Per-user failures: (user id, error description).
    pub failures: Vec<(Uuid, String)>,
}

/// Build a user's pattern profile from their recent records.
///
/// Pure: `now` is injected for testability.
pub fn build_profile(records: &[MemoryRecord], now: DateTime<Utc>) -> PatternProfile {
    let mut counts_by_type: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *counts_by_type
            .entry(record.content_type.clone())
            .or_insert(0) += 1;
    }

    let mut emotion_counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        if let Some(label) = record.emotion_label() {
            *emotion_counts.entry(label).or_insert(0) += 1;
        }
    }
    let dominant_emotion = emotion_counts
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(label, _)| label.to_string());

    let count_of = |t: &str| counts_by_type.get(t).copied().unwrap_or(0);
    let summary = ProfileSummary {
        top_excuses: count_of(content_type::EXCUSE),
        top_breakthroughs: count_of(content_type::BREAKTHROUGH),
        top_patterns: count_of(content_type::PATTERN),
    };

    PatternProfile {
        counts_by_type,
        dominant_emotion,
        summary,
        emerging_patterns: super::emerging::detect_emerging(records, now),
        updated_at: now,
    }
}

/// Runs the nightly aggregation batch.
pub struct PatternAggregator<U, M, P> {
    users: U,
    memories: M,
    profiles: P,
}

impl<U, M, P> PatternAggregator<U, M, P>
where
    U: UserRepository,
    M: MemoryRepository,
    P: ProfileRepository,
{
    pub fn new(users: U, memories: M, profiles: P) -> Self {
        Self {
            users,
            memories,
            profiles,
        }
    }

    /// Aggregate profiles for up to `user_cap` active users.
    ///
    /// Per-user failures land in the report; only a failure to list the
    /// active users is an error.
    #[tracing::instrument(name = "pattern_aggregation_run", skip(self), fields(user_cap))]
    pub async fn run(&self, user_cap: usize) -> Result<AggregationReport, RepositoryError> {
        let user_ids = match self.users.active_user_ids(user_cap).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "failed to list active users, aborting run");
                return Err(e);
            }
        };

        let mut report = AggregationReport::default();
        for user_id in user_ids {
            match self.aggregate_user(&user_id).await {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "user aggregation failed, continuing");
                    report.failures.push((user_id, e));
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            failed = report.failures.len(),
            "pattern aggregation run complete"
        );
        Ok(report)
    }

    async fn aggregate_user(&self, user_id: &Uuid) -> Result<(), String> {
        let records = self
            .memories
            .recent(user_id, SCAN_LIMIT)
            .await
            .map_err(|e| format!("fetch: {e}"))?;
        let profile = build_profile(&records, Utc::now());
        self.profiles
            .upsert(user_id, &profile)
            .await
            .map_err(|e| format!("upsert: {e}"))?;
        Ok(())
    }
}
