//! SQLite identity repository implementation.

use sqlx::Row;
use uuid::Uuid;

use memoir_core::repository::identity::IdentityRepository;
use memoir_types::error::RepositoryError;
use memoir_types::identity::IdentityRecord;

use super::memory::parse_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `IdentityRepository`.
pub struct SqliteIdentityRepository {
    pool: DatabasePool,
}

impl SqliteIdentityRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_identity(row: &sqlx::sqlite::SqliteRow) -> Result<IdentityRecord, RepositoryError> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let user_id_str: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| RepositoryError::Query(format!("invalid identity id: {e}")))?;
    let user_id = Uuid::parse_str(&user_id_str)
        .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

    let text = |column: &str| -> Result<Option<String>, RepositoryError> {
        row.try_get(column)
            .map_err(|e| RepositoryError::Query(e.to_string()))
    };

    let updated_at = text("updated_at")?
        .as_deref()
        .map(parse_datetime)
        .transpose()?;

    Ok(IdentityRecord {
        id,
        user_id,
        current_struggle: text("current_struggle")?,
        nightmare_self: text("nightmare_self")?,
        last_broken_promise: text("last_broken_promise")?,
        most_common_slip_moment: text("most_common_slip_moment")?,
        empty_excuse: text("empty_excuse")?,
        weak_excuse_counter: text("weak_excuse_counter")?,
        desired_outcome: text("desired_outcome")?,
        daily_non_negotiable: text("daily_non_negotiable")?,
        regret_if_no_change: text("regret_if_no_change")?,
        meaning_of_breaking_contract: text("meaning_of_breaking_contract")?,
        external_judgment: text("external_judgment")?,
        final_oath: text("final_oath")?,
        updated_at,
    })
}

impl IdentityRepository for SqliteIdentityRepository {
    async fn get_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<IdentityRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM identity WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_identity).transpose()
    }
}
