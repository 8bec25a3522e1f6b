//! Memory record repository trait definition.

use memoir_types::error::RepositoryError;
use memoir_types::memory::{MemoryRecord, ScoredMemory};
use uuid::Uuid;

/// Repository trait for memory record persistence and similarity search.
///
/// Implementations live in memoir-infra (e.g., SqliteMemoryRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MemoryRepository: Send + Sync {
    /// Insert a record, honoring the `(user_id, source_id, content_type,
    /// text_hash)` uniqueness invariant.
    ///
    /// The content type is part of the key because the identity projector
    /// intentionally stores the same text under two different tags (the
    /// oath field). When a record with the same dedup key already exists,
    /// the insert is a no-op and the *existing* record is returned, so
    /// callers always get the stored row and two identical creates yield
    /// the same id.
    fn insert_or_ignore(
        &self,
        record: &MemoryRecord,
    ) -> impl std::future::Future<Output = Result<MemoryRecord, RepositoryError>> + Send;

    /// Look up a record by its dedup key.
    fn find_by_fingerprint(
        &self,
        user_id: &Uuid,
        source_id: &str,
        content_type: &str,
        text_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<MemoryRecord>, RepositoryError>> + Send;

    /// All records for a user, newest first.
    fn get_all(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, RepositoryError>> + Send;

    /// The `limit` most recent records for a user, newest first.
    fn recent(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, RepositoryError>> + Send;

    /// Records whose cosine similarity to `query_embedding` is at least
    /// `threshold`, ordered by similarity descending, at most `limit`.
    fn search_similar(
        &self,
        user_id: &Uuid,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredMemory>, RepositoryError>> + Send;

    /// Delete all of a user's records whose metadata `source` equals
    /// `source_tag`. Returns the count of deleted rows.
    ///
    /// Used by the identity projector to clear identity-derived records
    /// before a resync.
    fn delete_by_source_tag(
        &self,
        user_id: &Uuid,
        source_tag: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
