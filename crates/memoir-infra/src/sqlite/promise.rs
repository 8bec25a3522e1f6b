//! SQLite promise repository implementation.

use sqlx::Row;
use uuid::Uuid;

use memoir_core::repository::promise::PromiseRepository;
use memoir_types::error::RepositoryError;
use memoir_types::promise::{PromiseRecord, PromiseStatus};

use super::memory::parse_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `PromiseRepository`.
pub struct SqlitePromiseRepository {
    pool: DatabasePool,
}

impl SqlitePromiseRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct PromiseRow {
    id: String,
    user_id: String,
    status: String,
    category: Option<String>,
    excuse_text: Option<String>,
    created_at: String,
}

impl PromiseRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            status: row.try_get("status")?,
            category: row.try_get("category")?,
            excuse_text: row.try_get("excuse_text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_promise(self) -> Result<PromiseRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid promise id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let status: PromiseStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(PromiseRecord {
            id,
            user_id,
            status,
            category: self.category,
            excuse_text: self.excuse_text,
            created_at,
        })
    }
}

impl PromiseRepository for SqlitePromiseRepository {
    async fn recent_promises(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<PromiseRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM promises WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut promises = Vec::with_capacity(rows.len());
        for row in &rows {
            let promise_row =
                PromiseRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            promises.push(promise_row.into_promise()?);
        }
        Ok(promises)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use chrono::Utc;

    #[tokio::test]
    async fn test_recent_promises_roundtrip() {
        let (_dir, pool) = test_pool().await;
        let user = Uuid::now_v7();

        sqlx::query(
            r#"INSERT INTO promises (id, user_id, status, category, excuse_text, created_at)
               VALUES (?, ?, 'broken', 'fitness', 'gym closed', ?)"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();

        let repo = SqlitePromiseRepository::new(pool);
        let promises = repo.recent_promises(&user, 10).await.unwrap();
        assert_eq!(promises.len(), 1);
        assert_eq!(promises[0].status, PromiseStatus::Broken);
        assert_eq!(promises[0].excuse_text.as_deref(), Some("gym closed"));
    }

    #[tokio::test]
    async fn test_invalid_status_is_query_error() {
        let (_dir, pool) = test_pool().await;
        let user = Uuid::now_v7();

        sqlx::query(
            r#"INSERT INTO promises (id, user_id, status, created_at) VALUES (?, ?, 'maybe', ?)"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();

        let repo = SqlitePromiseRepository::new(pool);
        let err = repo.recent_promises(&user, 10).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
