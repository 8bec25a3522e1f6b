//! Shared in-memory fakes for unit tests.
//!
//! The fakes implement the same ports the infrastructure layer implements,
//! so services can be tested without a database or network.

use chrono::Utc;
use uuid::Uuid;

use memoir_types::call::{CallRecord, ClassifiedSnippet};
use memoir_types::error::{ClassificationError, EmbeddingError, RepositoryError};
use memoir_types::identity::IdentityRecord;
use memoir_types::memory::{MemoryRecord, ScoredMemory};
use memoir_types::profile::PatternProfile;
use memoir_types::promise::PromiseRecord;

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::classify::TranscriptClassifier;
use crate::embedding::{cosine_similarity, Embedder};
use crate::hash::TextHasher;
use crate::repository::call::CallRepository;
use crate::repository::identity::IdentityRepository;
use crate::repository::memory::MemoryRepository;
use crate::repository::profile::ProfileRepository;
use crate::repository::promise::PromiseRepository;
use crate::repository::user::UserRepository;

/// Identity "hasher": normalized text is its own digest. Makes hash
/// collisions readable in assertions.
pub struct FakeHasher;

impl TextHasher for FakeHasher {
    fn compute_hash(&self, content: &str) -> String {
        content.to_string()
    }
}

/// Deterministic bag-of-words embedder: tokens hashed into a fixed-size
/// count vector, so identical texts embed identically and disjoint texts
/// are near-orthogonal.
#[derive(Default)]
pub struct FakeEmbedder;

const FAKE_DIM: usize = 64;

fn bag_of_words(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; FAKE_DIM];
    for token in text.to_lowercase().split_whitespace() {
        let mut h: u64 = 1469598103934665603;
        for b in token.bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(1099511628211);
        }
        v[(h % FAKE_DIM as u64) as usize] += 1.0;
    }
    v
}

impl Embedder for FakeEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(bag_of_words(text))
    }

    fn model_name(&self) -> &str {
        "fake-bag-of-words"
    }

    fn dimension(&self) -> usize {
        FAKE_DIM
    }
}

/// In-memory memory repository with per-user failure injection.
#[derive(Default)]
pub struct InMemoryMemoryRepository {
    records: Mutex<Vec<MemoryRecord>>,
    fail_users: Mutex<HashSet<Uuid>>,
}

impl InMemoryMemoryRepository {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn push(&self, record: MemoryRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Make all reads for `user_id` fail with a query error.
    pub fn fail_reads_for(&self, user_id: Uuid) {
        self.fail_users.lock().unwrap().insert(user_id);
    }

    fn check_failure(&self, user_id: &Uuid) -> Result<(), RepositoryError> {
        if self.fail_users.lock().unwrap().contains(user_id) {
            return Err(RepositoryError::Query("injected failure".to_string()));
        }
        Ok(())
    }

    fn sorted_for(&self, user_id: &Uuid) -> Vec<MemoryRecord> {
        let mut rows: Vec<MemoryRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

impl MemoryRepository for InMemoryMemoryRepository {
    async fn insert_or_ignore(
        &self,
        record: &MemoryRecord,
    ) -> Result<MemoryRecord, RepositoryError> {
        let mut rows = self.records.lock().unwrap();
        if let Some(existing) = rows.iter().find(|r| {
            r.user_id == record.user_id
                && r.source_id == record.source_id
                && r.content_type == record.content_type
                && r.metadata.text_hash == record.metadata.text_hash
        }) {
            return Ok(existing.clone());
        }
        rows.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_fingerprint(
        &self,
        user_id: &Uuid,
        source_id: &str,
        content_type: &str,
        text_hash: &str,
    ) -> Result<Option<MemoryRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                &r.user_id == user_id
                    && r.source_id == source_id
                    && r.content_type == content_type
                    && r.metadata.text_hash == text_hash
            })
            .cloned())
    }

    async fn get_all(&self, user_id: &Uuid) -> Result<Vec<MemoryRecord>, RepositoryError> {
        self.check_failure(user_id)?;
        Ok(self.sorted_for(user_id))
    }

    async fn recent(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        self.check_failure(user_id)?;
        let mut rows = self.sorted_for(user_id);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn search_similar(
        &self,
        user_id: &Uuid,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, RepositoryError> {
        self.check_failure(user_id)?;
        let mut scored: Vec<ScoredMemory> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.user_id == user_id)
            .map(|r| ScoredMemory {
                similarity: cosine_similarity(&r.embedding, query_embedding),
                record: r.clone(),
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
        let mut rows = self.records.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| {
            !(&r.user_id == user_id && r.metadata.source.as_deref() == Some(source_tag))
        });
        Ok((before - rows.len()) as u64)
    }
}

/// In-memory call repository.
#[derive(Default)]
pub struct InMemoryCallRepository {
    calls: Mutex<Vec<CallRecord>>,
}

impl InMemoryCallRepository {
    pub fn push(&self, call: CallRecord) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CallRepository for InMemoryCallRepository {
    async fn recent_calls(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<CallRecord>, RepositoryError> {
        let mut rows: Vec<CallRecord> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn get_by_id(&self, call_id: &Uuid) -> Result<Option<CallRecord>, RepositoryError> {
        Ok(self
            .calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == call_id)
            .cloned())
    }
}

/// In-memory promise repository.
#[derive(Default)]
pub struct InMemoryPromiseRepository {
    promises: Mutex<Vec<PromiseRecord>>,
}

impl InMemoryPromiseRepository {
    pub fn push(&self, promise: PromiseRecord) {
        self.promises.lock().unwrap().push(promise);
    }
}

impl PromiseRepository for InMemoryPromiseRepository {
    async fn recent_promises(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<PromiseRecord>, RepositoryError> {
        let mut rows: Vec<PromiseRecord> = self
            .promises
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// In-memory identity repository.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: Mutex<HashMap<Uuid, IdentityRecord>>,
}

impl InMemoryIdentityRepository {
    pub fn set(&self, record: IdentityRecord) {
        self.identities.lock().unwrap().insert(record.user_id, record);
    }
}

impl IdentityRepository for InMemoryIdentityRepository {
    async fn get_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<IdentityRecord>, RepositoryError> {
        Ok(self.identities.lock().unwrap().get(user_id).cloned())
    }
}

/// In-memory profile repository.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<Uuid, PatternProfile>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    async fn upsert(
        &self,
        user_id: &Uuid,
        profile: &PatternProfile,
    ) -> Result<(), RepositoryError> {
        self.profiles
            .lock()
            .unwrap()
            .insert(*user_id, profile.clone());
        Ok(())
    }

    async fn get(&self, user_id: &Uuid) -> Result<Option<PatternProfile>, RepositoryError> {
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }
}

/// In-memory user repository with a fixed id list, or a scripted
/// listing failure.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<Uuid>>,
    fail_listing: bool,
}

impl InMemoryUserRepository {
    pub fn with_users(users: Vec<Uuid>) -> Self {
        Self {
            users: Mutex::new(users),
            fail_listing: false,
        }
    }

    /// A repository whose listing always fails with a connection error.
    pub fn failing() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            fail_listing: true,
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn active_user_ids(&self, limit: usize) -> Result<Vec<Uuid>, RepositoryError> {
        if self.fail_listing {
            return Err(RepositoryError::Connection);
        }
        let mut users = self.users.lock().unwrap().clone();
        users.truncate(limit);
        Ok(users)
    }
}

/// Classifier that replays scripted snippet lists, or fails.
pub struct ScriptedClassifier {
    responses: Mutex<Vec<Result<Vec<ClassifiedSnippet>, ClassificationError>>>,
}

impl ScriptedClassifier {
    /// Responses are consumed front-to-back, one per `classify` call.
    pub fn new(responses: Vec<Result<Vec<ClassifiedSnippet>, ClassificationError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

impl TranscriptClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        _transcript: &str,
        _summary: Option<&str>,
    ) -> Result<Vec<ClassifiedSnippet>, ClassificationError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(Vec::new());
        }
        responses.remove(0)
    }
}

/// Convenience constructor for call records in tests.
pub fn test_call(user_id: Uuid, successful: bool, transcript: Option<Vec<(&str, &str)>>) -> CallRecord {
    CallRecord {
        id: Uuid::now_v7(),
        user_id,
        transcript: transcript.map(|turns| {
            turns
                .into_iter()
                .map(|(role, message)| memoir_types::call::TranscriptTurn {
                    role: role.to_string(),
                    message: message.to_string(),
                })
                .collect()
        }),
        transcript_summary: None,
        created_at: Utc::now(),
        call_successful: Some(if successful { "success" } else { "failure" }.to_string()),
        call_type: None,
        tone_used: None,
        duration_sec: 60,
    }
}
