//! SQLite memory repository implementation.
//!
//! Implements `MemoryRepository` from `memoir-core` using sqlx with split
//! read/write pools: raw queries, private Row structs. Embeddings are
//! stored as JSON arrays and similarity is ranked in-process; the dataset
//! per user is bounded, so a vector index is not needed here.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use memoir_core::embedding::cosine_similarity;
use memoir_core::repository::memory::MemoryRepository;
use memoir_types::error::RepositoryError;
use memoir_types::memory::{MemoryMetadata, MemoryRecord, ScoredMemory};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MemoryRepository`.
pub struct SqliteMemoryRepository {
    pool: DatabasePool,
}

impl SqliteMemoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MemoryRecordRow {
    id: String,
    user_id: String,
    source_id: String,
    content_type: String,
    text_content: String,
    embedding: String,
    metadata: String,
    created_at: String,
}

impl MemoryRecordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            source_id: row.try_get("source_id")?,
            content_type: row.try_get("content_type")?,
            text_content: row.try_get("text_content")?,
            embedding: row.try_get("embedding")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<MemoryRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid memory id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let embedding: Vec<f32> = serde_json::from_str(&self.embedding)
            .map_err(|e| RepositoryError::Query(format!("invalid embedding json: {e}")))?;
        let metadata: MemoryMetadata = serde_json::from_str(&self.metadata)
            .map_err(|e| RepositoryError::Query(format!("invalid metadata json: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(MemoryRecord {
            id,
            user_id,
            source_id: self.source_id,
            content_type: self.content_type,
            text_content: self.text_content,
            embedding,
            metadata,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// MemoryRepository implementation
// ---------------------------------------------------------------------------

impl MemoryRepository for SqliteMemoryRepository {
    async fn insert_or_ignore(
        &self,
        record: &MemoryRecord,
    ) -> Result<MemoryRecord, RepositoryError> {
        let embedding = serde_json::to_string(&record.embedding)
            .map_err(|e| RepositoryError::Query(format!("embedding serialization: {e}")))?;
        let metadata = serde_json::to_string(&record.metadata)
            .map_err(|e| RepositoryError::Query(format!("metadata serialization: {e}")))?;

        sqlx::query(
            r#"INSERT OR IGNORE INTO memory_records
               (id, user_id, source_id, content_type, text_content, embedding, metadata, text_hash, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.source_id)
        .bind(&record.content_type)
        .bind(&record.text_content)
        .bind(embedding)
        .bind(metadata)
        .bind(&record.metadata.text_hash)
        .bind(format_datetime(&record.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Re-fetch so a dedup hit returns the existing row, not ours.
        self.find_by_fingerprint(
            &record.user_id,
            &record.source_id,
            &record.content_type,
            &record.metadata.text_hash,
        )
        .await?
        .ok_or_else(|| RepositoryError::Query("record missing after insert".to_string()))
    }

    async fn find_by_fingerprint(
        &self,
        user_id: &Uuid,
        source_id: &str,
        content_type: &str,
        text_hash: &str,
    ) -> Result<Option<MemoryRecord>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM memory_records
               WHERE user_id = ? AND source_id = ? AND content_type = ? AND text_hash = ?"#,
        )
        .bind(user_id.to_string())
        .bind(source_id)
        .bind(content_type)
        .bind(text_hash)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            MemoryRecordRow::from_row(&r)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_record()
        })
        .transpose()
    }

    async fn get_all(&self, user_id: &Uuid) -> Result<Vec<MemoryRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM memory_records WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_records(&rows)
    }

    async fn recent(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM memory_records WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_records(&rows)
    }

    async fn search_similar(
        &self,
        user_id: &Uuid,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, RepositoryError> {
        let records = self.get_all(user_id).await?;

        let mut scored: Vec<ScoredMemory> = records
            .into_iter()
            .map(|record| ScoredMemory {
                similarity: cosine_similarity(&record.embedding, query_embedding),
                record,
            })
            .filter(|m| m.similarity >= threshold)
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn delete_by_source_tag(
        &self,
        user_id: &Uuid,
        source_tag: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"DELETE FROM memory_records
               WHERE user_id = ? AND json_extract(metadata, '$.source') = ?"#,
        )
        .bind(user_id.to_string())
        .bind(source_tag)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

fn rows_to_records(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<MemoryRecord>, RepositoryError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let record_row =
            MemoryRecordRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        records.push(record_row.into_record()?);
    }
    Ok(records)
}
