//! Embedding generation port.
//!
//! Defines the interface for turning text into dense vectors. The concrete
//! OpenAI-backed implementation lives in memoir-infra.

use memoir_types::error::EmbeddingError;

/// Trait for text embedding providers.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in memoir-infra.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts in one provider call.
    ///
    /// The result must contain exactly one vector per input text, in input
    /// order. Implementations return [`EmbeddingError::BatchMismatch`] when
    /// the provider violates this.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// Embed a single text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Provider model identifier, recorded for observability.
    fn model_name(&self) -> &str;

    /// Output vector dimension.
    fn dimension(&self) -> usize;
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs, which ranks such
/// pairs below any real match instead of erroring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
