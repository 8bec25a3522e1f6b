//! SQLite user repository implementation.

use sqlx::Row;
use uuid::Uuid;

use memoir_core::repository::user::UserRepository;
use memoir_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn active_user_ids(&self, limit: usize) -> Result<Vec<Uuid>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id FROM users WHERE is_active = 1 ORDER BY created_at ASC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row
                .try_get("id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            ids.push(
                Uuid::parse_str(&id)
                    .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?,
            );
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use chrono::Utc;

    async fn insert_user(pool: &DatabasePool, active: bool) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO users (id, is_active, created_at) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(if active { 1i64 } else { 0i64 })
            .bind(Utc::now().to_rfc3339())
            .execute(&pool.writer)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_active_users_only_and_capped() {
        let (_dir, pool) = test_pool().await;
        let active1 = insert_user(&pool, true).await;
        let _inactive = insert_user(&pool, false).await;
        let active2 = insert_user(&pool, true).await;
        let _active3 = insert_user(&pool, true).await;

        let repo = SqliteUserRepository::new(pool);
        let ids = repo.active_user_ids(2).await.unwrap();
        assert_eq!(ids, vec![active1, active2]);
    }
}
