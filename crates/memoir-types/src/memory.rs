//! Memory record types for Memoir.
//!
//! A memory record is one embedded psychological fact tied to a user and a
//! source (a call or an identity record). The content type is an open string
//! tag, not a closed enum -- new categories appear over time as the extraction
//! step evolves, so well-known tags are exposed as constants instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeMap;

/// Well-known content type tags.
///
/// The `content_type` field of a [`MemoryRecord`] is deliberately an open
/// `String`; these constants cover the tags the extraction and projection
/// steps currently produce.
pub mod content_type {
    pub const EXCUSE: &str = "excuse";
    pub const BREAKTHROUGH: &str = "breakthrough";
    pub const COMMITMENT: &str = "commitment";
    pub const TRIGGER: &str = "trigger";
    pub const PATTERN: &str = "pattern";
    pub const EMOTION: &str = "emotion";

    // Identity-projected tags.
    pub const SELF_DECEPTION: &str = "self_deception";
    pub const NIGHTMARE_FEAR: &str = "nightmare_fear";
    pub const BROKEN_PROMISE: &str = "broken_promise";
    pub const TRIGGER_MOMENT: &str = "trigger_moment";
    pub const EXCUSE_PATTERN: &str = "excuse_pattern";
    pub const VISION: &str = "vision";
    pub const REGRET_FEAR: &str = "regret_fear";
    pub const BETRAYAL_COST: &str = "betrayal_cost";
    pub const SHAME_SOURCE: &str = "shame_source";
    pub const SACRED_OATH: &str = "sacred_oath";
    pub const BINDING_COMMITMENT: &str = "binding_commitment";
}

/// Provenance tag values stored in `metadata.source`.
pub mod provenance {
    /// Records projected from the identity (onboarding) table.
    pub const IDENTITY_TABLE: &str = "identity_table";
    /// Records extracted from call transcripts.
    pub const CALL_TRANSCRIPT: &str = "call_transcript";
}

/// Metadata attached to a memory record.
///
/// Known fields are typed and validated defensively; anything else the
/// producer attaches survives round-trips through the flattened `extra` map.
/// `text_length` and `text_hash` are always present -- the hash is the
/// deduplication key, computed over the *normalized* text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetadata {
    /// Length of the stored (non-normalized) text in characters.
    pub text_length: usize,
    /// SHA-256 hex digest of the normalized text. Deduplication key.
    pub text_hash: String,
    /// Provenance tag, e.g. "identity_table" or "call_transcript".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_success: Option<String>,
    /// Classifier confidence for extracted snippets (0.0 to 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_used: Option<String>,
    /// The identity field an identity-projected record came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_field: Option<String>,
    /// Emotion label, when the extraction step attaches one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    /// Open extension map for fields this subsystem does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One embedded psychological fact.
///
/// Immutable once written. At most one record exists per
/// `(user_id, source_id, content_type, text_hash)` tuple; the stored text
/// is verbatim, normalization only ever affects the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Identifier of the originating record (call id or identity record id).
    pub source_id: String,
    /// Open string tag (see [`content_type`]).
    pub content_type: String,
    /// Original natural-language text, stored verbatim.
    pub text_content: String,
    /// Fixed-dimension embedding vector, generated at creation time.
    pub embedding: Vec<f32>,
    pub metadata: MemoryMetadata,
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// The emotion label for this record, if any: `metadata.emotion`
    /// falling back to `metadata.tone_used`.
    pub fn emotion_label(&self) -> Option<&str> {
        self.metadata
            .emotion
            .as_deref()
            .or(self.metadata.tone_used.as_deref())
    }
}

/// A memory record paired with its cosine similarity to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMemory {
    pub record: MemoryRecord,
    /// Cosine similarity to the query embedding (higher is closer).
    pub similarity: f32,
}
