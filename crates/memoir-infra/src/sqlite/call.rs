//! SQLite call repository implementation.
//!
//! Read-only: call rows are written by the telephony layer. Transcripts are
//! stored as JSON arrays of role/message turns; a malformed transcript is
//! treated as absent rather than failing the whole fetch.

use sqlx::Row;
use uuid::Uuid;

use memoir_core::repository::call::CallRepository;
use memoir_types::call::{CallRecord, TranscriptTurn};
use memoir_types::error::RepositoryError;

use super::memory::parse_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `CallRepository`.
pub struct SqliteCallRepository {
    pool: DatabasePool,
}

impl SqliteCallRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct CallRow {
    id: String,
    user_id: String,
    transcript: Option<String>,
    transcript_summary: Option<String>,
    created_at: String,
    call_successful: Option<String>,
    call_type: Option<String>,
    tone_used: Option<String>,
    duration_sec: i64,
}

impl CallRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            transcript: row.try_get("transcript")?,
            transcript_summary: row.try_get("transcript_summary")?,
            created_at: row.try_get("created_at")?,
            call_successful: row.try_get("call_successful")?,
            call_type: row.try_get("call_type")?,
            tone_used: row.try_get("tone_used")?,
            duration_sec: row.try_get("duration_sec")?,
        })
    }

    fn into_call(self) -> Result<CallRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid call id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        let transcript: Option<Vec<TranscriptTurn>> = match self.transcript.as_deref() {
            Some(json) => match serde_json::from_str(json) {
                Ok(turns) => Some(turns),
                Err(e) => {
                    tracing::warn!(call_id = %id, error = %e, "malformed transcript json, treating as absent");
                    None
                }
            },
            None => None,
        };

        Ok(CallRecord {
            id,
            user_id,
            transcript,
            transcript_summary: self.transcript_summary,
            created_at,
            call_successful: self.call_successful,
            call_type: self.call_type,
            tone_used: self.tone_used,
            duration_sec: self.duration_sec,
        })
    }
}

impl CallRepository for SqliteCallRepository {
    async fn recent_calls(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<CallRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM calls WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut calls = Vec::with_capacity(rows.len());
        for row in &rows {
            let call_row =
                CallRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            calls.push(call_row.into_call()?);
        }
        Ok(calls)
    }

    async fn get_by_id(&self, call_id: &Uuid) -> Result<Option<CallRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM calls WHERE id = ?")
            .bind(call_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            CallRow::from_row(&r)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_call()
        })
        .transpose()
    }
}
