//! SQLite pattern profile repository implementation.
//!
//! One row per user, fully replaced on upsert. The counts map and emerging
//! pattern list are stored as JSON columns.

use sqlx::Row;
use uuid::Uuid;

use memoir_core::repository::profile::ProfileRepository;
use memoir_types::error::RepositoryError;
use memoir_types::profile::{EmergingPattern, PatternProfile, ProfileSummary};

use std::collections::BTreeMap;

use super::memory::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn upsert(
        &self,
        user_id: &Uuid,
        profile: &PatternProfile,
    ) -> Result<(), RepositoryError> {
        let counts = serde_json::to_string(&profile.counts_by_type)
            .map_err(|e| RepositoryError::Query(format!("counts serialization: {e}")))?;
        let emerging = serde_json::to_string(&profile.emerging_patterns)
            .map_err(|e| RepositoryError::Query(format!("emerging serialization: {e}")))?;

        sqlx::query(
            r#"INSERT INTO pattern_profiles
               (user_id, counts_by_type, dominant_emotion, top_excuses, top_breakthroughs, top_patterns, emerging_patterns, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                 counts_by_type = excluded.counts_by_type,
                 dominant_emotion = excluded.dominant_emotion,
                 top_excuses = excluded.top_excuses,
                 top_breakthroughs = excluded.top_breakthroughs,
                 top_patterns = excluded.top_patterns,
                 emerging_patterns = excluded.emerging_patterns,
                 updated_at = excluded.updated_at"#,
        )
        .bind(user_id.to_string())
        .bind(counts)
        .bind(&profile.dominant_emotion)
        .bind(profile.summary.top_excuses as i64)
        .bind(profile.summary.top_breakthroughs as i64)
        .bind(profile.summary.top_patterns as i64)
        .bind(emerging)
        .bind(format_datetime(&profile.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, user_id: &Uuid) -> Result<Option<PatternProfile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM pattern_profiles WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let counts_json: String = row
            .try_get("counts_by_type")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let counts_by_type: BTreeMap<String, u64> = serde_json::from_str(&counts_json)
            .map_err(|e| RepositoryError::Query(format!("invalid counts json: {e}")))?;

        let emerging_json: String = row
            .try_get("emerging_patterns")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let emerging_patterns: Vec<EmergingPattern> = serde_json::from_str(&emerging_json)
            .map_err(|e| RepositoryError::Query(format!("invalid emerging json: {e}")))?;

        let dominant_emotion: Option<String> = row
            .try_get("dominant_emotion")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let top_excuses: i64 = row
            .try_get("top_excuses")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let top_breakthroughs: i64 = row
            .try_get("top_breakthroughs")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let top_patterns: i64 = row
            .try_get("top_patterns")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let updated_at_str: String = row
            .try_get("updated_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Some(PatternProfile {
            counts_by_type,
            dominant_emotion,
            summary: ProfileSummary {
                top_excuses: top_excuses as u64,
                top_breakthroughs: top_breakthroughs as u64,
                top_patterns: top_patterns as u64,
            },
            emerging_patterns,
            updated_at: parse_datetime(&updated_at_str)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use chrono::Utc;

    fn profile(excuses: u64) -> PatternProfile {
        let mut counts = BTreeMap::new();
        counts.insert("excuse".to_string(), excuses);
        PatternProfile {
            counts_by_type: counts,
            dominant_emotion: Some("fear".to_string()),
            summary: ProfileSummary {
                top_excuses: excuses,
                ..Default::default()
            },
            emerging_patterns: vec![EmergingPattern {
                key: "k".to_string(),
                sample_text: "too busy".to_string(),
                recent_count: 4,
                baseline_count: 0,
                growth_factor: 5.0,
            }],
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_previous_profile() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteProfileRepository::new(pool);
        let user = Uuid::now_v7();

        repo.upsert(&user, &profile(2)).await.unwrap();
        repo.upsert(&user, &profile(7)).await.unwrap();

        let stored = repo.get(&user).await.unwrap().unwrap();
        assert_eq!(stored.summary.top_excuses, 7);
        assert_eq!(stored.counts_by_type.get("excuse"), Some(&7));
        assert_eq!(stored.emerging_patterns.len(), 1);
        assert_eq!(stored.emerging_patterns[0].growth_factor, 5.0);
    }

    #[tokio::test]
    async fn test_get_missing_profile_is_none() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteProfileRepository::new(pool);
        assert!(repo.get(&Uuid::now_v7()).await.unwrap().is_none());
    }
}
