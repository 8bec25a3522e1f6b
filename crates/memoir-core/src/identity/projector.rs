//! Projects the onboarding identity baseline into memory records.
//!
//! Each non-empty identity field becomes one memory record tagged with a
//! content type from the mapping table below. The oath field intentionally
//! produces two records: the oath as a sacred statement, and the same text
//! as a binding commitment.

use uuid::Uuid;

use memoir_types::error::MemoryServiceError;
use memoir_types::identity::IdentityRecord;
use memoir_types::memory::{content_type, provenance, MemoryMetadata, MemoryRecord};

use crate::embedding::Embedder;
use crate::hash::TextHasher;
use crate::memory::{MemoryService, NewMemory};
use crate::repository::identity::IdentityRepository;
use crate::repository::memory::MemoryRepository;

/// Field-to-tag projections for one identity record. The oath maps twice.
fn field_projections(record: &IdentityRecord) -> Vec<(&'static str, &'static str, &Option<String>)> {
    vec![
        ("current_struggle", content_type::SELF_DECEPTION, &record.current_struggle),
        ("nightmare_self", content_type::NIGHTMARE_FEAR, &record.nightmare_self),
        ("last_broken_promise", content_type::BROKEN_PROMISE, &record.last_broken_promise),
        ("most_common_slip_moment", content_type::TRIGGER_MOMENT, &record.most_common_slip_moment),
        ("empty_excuse", content_type::EXCUSE, &record.empty_excuse),
        ("weak_excuse_counter", content_type::EXCUSE_PATTERN, &record.weak_excuse_counter),
        ("desired_outcome", content_type::VISION, &record.desired_outcome),
        ("daily_non_negotiable", content_type::COMMITMENT, &record.daily_non_negotiable),
        ("regret_if_no_change", content_type::REGRET_FEAR, &record.regret_if_no_change),
        ("meaning_of_breaking_contract", content_type::BETRAYAL_COST, &record.meaning_of_breaking_contract),
        ("external_judgment", content_type::SHAME_SOURCE, &record.external_judgment),
        ("final_oath", content_type::SACRED_OATH, &record.final_oath),
        ("final_oath", content_type::BINDING_COMMITMENT, &record.final_oath),
    ]
}

/// Projects identity records into the memory store.
pub struct IdentityProjector<I> {
    identity_repo: I,
}

impl<I> IdentityProjector<I>
where
    I: IdentityRepository,
{
    pub fn new(identity_repo: I) -> Self {
        Self { identity_repo }
    }

    /// Sync a user's identity baseline into memory records.
    ///
    /// Idempotent: unchanged fields dedup against their existing records.
    /// A user with no identity record yields zero records, not an error.
    /// Returns the stored records (existing ones on dedup hits).
    #[tracing::instrument(name = "identity_sync", skip(self, memory), fields(user_id = %user_id))]
    pub async fn sync<R, E, H>(
        &self,
        memory: &MemoryService<R, E, H>,
        user_id: &Uuid,
    ) -> Result<Vec<MemoryRecord>, MemoryServiceError>
    where
        R: MemoryRepository,
        E: Embedder,
        H: TextHasher,
    {
        let Some(identity) = self.identity_repo.get_by_user(user_id).await? else {
            tracing::debug!("no identity record, nothing to project");
            return Ok(Vec::new());
        };

        let items: Vec<NewMemory> = field_projections(&identity)
            .into_iter()
            .filter_map(|(field, tag, value)| {
                let text = value.as_deref()?.trim();
                if text.is_empty() {
                    return None;
                }
                Some(NewMemory {
                    user_id: *user_id,
                    source_id: identity.id.to_string(),
                    content_type: tag.to_string(),
                    text: text.to_string(),
                    metadata: MemoryMetadata {
                        source: Some(provenance::IDENTITY_TABLE.to_string()),
                        identity_field: Some(field.to_string()),
                        ..Default::default()
                    },
                })
            })
            .collect();

        memory.batch_create(items).await
    }

    /// Full resync: delete all identity-derived records for the user, then
    /// project the current identity from scratch.
    ///
    /// Used when identity answers have been edited, so stale projections
    /// from the old answers do not linger.
    #[tracing::instrument(name = "identity_resync", skip(self, memory), fields(user_id = %user_id))]
    pub async fn resync<R, E, H>(
        &self,
        memory: &MemoryService<R, E, H>,
        user_id: &Uuid,
    ) -> Result<Vec<MemoryRecord>, MemoryServiceError>
    where
        R: MemoryRepository,
        E: Embedder,
        H: TextHasher,
    {
        let deleted = memory
            .repository()
            .delete_by_source_tag(user_id, provenance::IDENTITY_TABLE)
            .await?;
        tracing::info!(deleted, "cleared identity-derived records before resync");
        self.sync(memory, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEmbedder, FakeHasher, InMemoryIdentityRepository, InMemoryMemoryRepository};

    fn memory_service() -> MemoryService<InMemoryMemoryRepository, FakeEmbedder, FakeHasher> {
        MemoryService::new(
            InMemoryMemoryRepository::default(),
            FakeEmbedder::default(),
            FakeHasher,
        )
    }

    fn identity(user_id: Uuid) -> IdentityRecord {
        IdentityRecord {
            id: Uuid::now_v7(),
            user_id,
            empty_excuse: Some("I'll start Monday".to_string()),
            final_oath: Some("I will not lie to myself".to_string()),
            nightmare_self: Some("  ".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_oath_projects_twice_and_blank_fields_skipped() {
        let user = Uuid::now_v7();
        let repo = InMemoryIdentityRepository::default();
        repo.set(identity(user));
        let projector = IdentityProjector::new(repo);
        let memory = memory_service();

        let records = projector.sync(&memory, &user).await.unwrap();

        // empty_excuse + final_oath x2; blank nightmare_self skipped.
        assert_eq!(records.len(), 3);
        let tags: Vec<&str> = records.iter().map(|r| r.content_type.as_str()).collect();
        assert!(tags.contains(&content_type::EXCUSE));
        assert!(tags.contains(&content_type::SACRED_OATH));
        assert!(tags.contains(&content_type::BINDING_COMMITMENT));
        assert!(records
            .iter()
            .all(|r| r.metadata.source.as_deref() == Some(provenance::IDENTITY_TABLE)));
        assert!(records
            .iter()
            .any(|r| r.metadata.identity_field.as_deref() == Some("final_oath")));
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let user = Uuid::now_v7();
        let repo = InMemoryIdentityRepository::default();
        repo.set(identity(user));
        let projector = IdentityProjector::new(repo);
        let memory = memory_service();

        projector.sync(&memory, &user).await.unwrap();
        projector.sync(&memory, &user).await.unwrap();
        assert_eq!(memory.repository().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_identity_yields_empty() {
        let projector = IdentityProjector::new(InMemoryIdentityRepository::default());
        let memory = memory_service();
        let records = projector.sync(&memory, &Uuid::now_v7()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_resync_clears_stale_projections() {
        let user = Uuid::now_v7();
        let repo = InMemoryIdentityRepository::default();
        let mut record = identity(user);
        repo.set(record.clone());
        let projector = IdentityProjector::new(repo);
        let memory = memory_service();

        projector.sync(&memory, &user).await.unwrap();

        // User edits their excuse answer.
        record.empty_excuse = Some("I'm too tired at night".to_string());
        projector.identity_repo.set(record);

        let records = projector.resync(&memory, &user).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(memory.repository().len(), 3);
        let all = memory.get_all(&user).await.unwrap();
        assert!(all
            .iter()
            .any(|r| r.text_content == "I'm too tired at night"));
        assert!(!all.iter().any(|r| r.text_content == "I'll start Monday"));
    }
}
