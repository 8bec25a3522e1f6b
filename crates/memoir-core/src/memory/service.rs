//! Memory service: dedup-aware creation and semantic search.

use chrono::Utc;
use uuid::Uuid;

use memoir_types::error::MemoryServiceError;
use memoir_types::insights::MemoryInsights;
use memoir_types::memory::{MemoryMetadata, MemoryRecord, ScoredMemory};

use crate::embedding::Embedder;
use crate::hash::{normalize_text, TextHasher};
use crate::repository::memory::MemoryRepository;

/// Default similarity floor: 0.9 is near-duplicate, 0.8 strong match,
/// 0.7 usable signal, 0.6 loose association.
pub const DEFAULT_SEARCH_THRESHOLD: f32 = 0.7;
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Window of records fed into the insight computation.
const INSIGHTS_SCAN_LIMIT: usize = 500;

/// Input for creating one memory record.
///
/// `metadata.text_length` and `metadata.text_hash` are overwritten by the
/// service; callers only fill provenance fields.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub user_id: Uuid,
    pub source_id: String,
    pub content_type: String,
    pub text: String,
    pub metadata: MemoryMetadata,
}

/// The memory store: creation with idempotent dedup, batch creation with a
/// single batched embedding call, and similarity search.
pub struct MemoryService<R, E, H> {
    repository: R,
    embedder: E,
    hasher: H,
}

impl<R, E, H> MemoryService<R, E, H>
where
    R: MemoryRepository,
    E: Embedder,
    H: TextHasher,
{
    pub fn new(repository: R, embedder: E, hasher: H) -> Self {
        Self {
            repository,
            embedder,
            hasher,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create one memory record, or return the existing one when the
    /// `(user_id, source_id, content_type, text_hash)` fingerprint already
    /// exists.
    ///
    /// The embedding call is skipped entirely on a dedup hit, so repeated
    /// creates of the same fact cost no provider traffic.
    #[tracing::instrument(
        name = "memory_create",
        skip(self, input),
        fields(user_id = %input.user_id, source_id = %input.source_id, content_type = %input.content_type)
    )]
    pub async fn create(&self, input: NewMemory) -> Result<MemoryRecord, MemoryServiceError> {
        let normalized = normalize_text(&input.text);
        if normalized.is_empty() {
            return Err(MemoryServiceError::InvalidInput(
                "memory text is empty after normalization".to_string(),
            ));
        }
        let text_hash = self.hasher.compute_hash(&normalized);

        if let Some(existing) = self
            .repository
            .find_by_fingerprint(&input.user_id, &input.source_id, &input.content_type, &text_hash)
            .await?
        {
            tracing::debug!(record_id = %existing.id, "duplicate memory fingerprint, returning existing record");
            return Ok(existing);
        }

        let embedding = self.embedder.embed(&input.text).await?;
        let record = self.build_record(input, text_hash, embedding);
        let stored = self.repository.insert_or_ignore(&record).await?;
        Ok(stored)
    }

    /// Create many records with one batched embedding call.
    ///
    /// Items whose text normalizes to empty are skipped. Inserts are per-row:
    /// a dedup hit on one item returns its existing record and does not
    /// affect the others.
    #[tracing::instrument(name = "memory_batch_create", skip(self, items), fields(item_count = items.len()))]
    pub async fn batch_create(
        &self,
        items: Vec<NewMemory>,
    ) -> Result<Vec<MemoryRecord>, MemoryServiceError> {
        let prepared: Vec<(NewMemory, String)> = items
            .into_iter()
            .filter_map(|item| {
                let normalized = normalize_text(&item.text);
                if normalized.is_empty() {
                    tracing::warn!(source_id = %item.source_id, "skipping empty memory text in batch");
                    return None;
                }
                let hash = self.hasher.compute_hash(&normalized);
                Some((item, hash))
            })
            .collect();

        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = prepared.iter().map(|(i, _)| i.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut stored = Vec::with_capacity(prepared.len());
        for ((input, text_hash), embedding) in prepared.into_iter().zip(embeddings) {
            let record = self.build_record(input, text_hash, embedding);
            stored.push(self.repository.insert_or_ignore(&record).await?);
        }
        Ok(stored)
    }

    /// Search a user's memories by semantic similarity to `query`.
    #[tracing::instrument(name = "memory_search", skip(self, query), fields(user_id = %user_id, threshold, limit))]
    pub async fn search(
        &self,
        user_id: &Uuid,
        query: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        let embedding = self.embedder.embed(query).await?;
        let results = self
            .repository
            .search_similar(user_id, &embedding, threshold, limit)
            .await?;
        Ok(results)
    }

    /// Search restricted to a set of content types.
    ///
    /// The similarity ranking has no type filter built in, so this
    /// over-fetches 2x the limit, filters, then truncates.
    #[tracing::instrument(name = "memory_search_by_types", skip(self, query, types), fields(user_id = %user_id, type_count = types.len()))]
    pub async fn search_by_types(
        &self,
        user_id: &Uuid,
        query: &str,
        types: &[String],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        let embedding = self.embedder.embed(query).await?;
        let candidates = self
            .repository
            .search_similar(user_id, &embedding, threshold, limit * 2)
            .await?;
        let mut filtered: Vec<ScoredMemory> = candidates
            .into_iter()
            .filter(|m| types.iter().any(|t| t == &m.record.content_type))
            .collect();
        filtered.truncate(limit);
        Ok(filtered)
    }

    /// Persist extracted call insights as memory records.
    ///
    /// Each insight becomes one record with call-transcript provenance;
    /// re-running extraction over the same calls dedups instead of
    /// duplicating.
    #[tracing::instrument(name = "memory_persist_insights", skip(self, insights), fields(user_id = %user_id, insight_count = insights.len()))]
    pub async fn persist_call_insights(
        &self,
        user_id: &Uuid,
        insights: Vec<memoir_types::call::CallInsight>,
    ) -> Result<Vec<MemoryRecord>, MemoryServiceError> {
        let items: Vec<NewMemory> = insights
            .into_iter()
            .map(|insight| NewMemory {
                user_id: *user_id,
                source_id: insight.call_id.to_string(),
                content_type: insight.content_type,
                text: insight.text_content,
                metadata: MemoryMetadata {
                    source: Some(memoir_types::memory::provenance::CALL_TRANSCRIPT.to_string()),
                    call_date: Some(insight.call_date),
                    call_success: Some(insight.call_success),
                    confidence: Some(insight.confidence),
                    call_type: insight.call_type,
                    tone_used: insight.tone_used,
                    ..Default::default()
                },
            })
            .collect();
        self.batch_create(items).await
    }

    /// All of a user's records, newest first.
    pub async fn get_all(&self, user_id: &Uuid) -> Result<Vec<MemoryRecord>, MemoryServiceError> {
        Ok(self.repository.get_all(user_id).await?)
    }

    /// Processed insight aggregate over the user's recent records.
    #[tracing::instrument(name = "memory_insights", skip(self), fields(user_id = %user_id))]
    pub async fn insights(&self, user_id: &Uuid) -> Result<MemoryInsights, MemoryServiceError> {
        let records = self
            .repository
            .recent(user_id, INSIGHTS_SCAN_LIMIT)
            .await?;
        Ok(super::insights::compute_insights(&records, Utc::now()))
    }

    fn build_record(&self, input: NewMemory, text_hash: String, embedding: Vec<f32>) -> MemoryRecord {
        let mut metadata = input.metadata;
        metadata.text_length = input.text.chars().count();
        metadata.text_hash = text_hash;

        MemoryRecord {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            source_id: input.source_id,
            content_type: input.content_type,
            text_content: input.text,
            embedding,
            metadata,
            created_at: Utc::now(),
        }
    }
}
