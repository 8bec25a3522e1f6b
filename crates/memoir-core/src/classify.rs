//! Transcript classification port.

use memoir_types::call::ClassifiedSnippet;
use memoir_types::error::ClassificationError;

/// Trait for LLM-backed transcript classification.
///
/// Given a rendered transcript and an optional summary, returns categorized
/// psychological snippets. Implementations live in memoir-infra.
pub trait TranscriptClassifier: Send + Sync {
    fn classify(
        &self,
        transcript: &str,
        summary: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<ClassifiedSnippet>, ClassificationError>> + Send;
}
