//! Call record and transcript-extraction types.
//!
//! A call record carries an optional transcript (ordered role/message turns)
//! plus outcome metadata. The extractor turns transcripts into transient
//! [`CallInsight`] values, which only become memory records when explicitly
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One turn of a call transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: String,
    pub message: String,
}

/// A recorded accountability call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Ordered conversation turns; `None` when no transcript was captured.
    pub transcript: Option<Vec<TranscriptTurn>>,
    pub transcript_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Outcome tag, e.g. "success", "failure", "unknown". Open string.
    pub call_successful: Option<String>,
    pub call_type: Option<String>,
    pub tone_used: Option<String>,
    pub duration_sec: i64,
}

impl CallRecord {
    /// Whether the call was marked successful.
    pub fn is_successful(&self) -> bool {
        self.call_successful.as_deref() == Some("success")
    }

    /// Render the transcript as `"role: message"` lines for classification.
    ///
    /// Returns `None` when there is no transcript or it is empty.
    pub fn transcript_text(&self) -> Option<String> {
        let turns = self.transcript.as_ref()?;
        if turns.is_empty() {
            return None;
        }
        Some(
            turns
                .iter()
                .map(|t| format!("{}: {}", t.role, t.message))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// A categorized snippet returned by the transcript classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedSnippet {
    /// One of the six extraction categories (excuse, breakthrough,
    /// commitment, trigger, pattern, emotion). Open string.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub confidence: f32,
}

/// A psychological snippet extracted from one call, annotated with call
/// metadata. Transient -- not persisted as its own entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallInsight {
    pub call_id: Uuid,
    pub content_type: String,
    pub text_content: String,
    pub confidence: f32,
    pub call_date: DateTime<Utc>,
    pub call_success: String,
    pub call_type: Option<String>,
    pub tone_used: Option<String>,
}
