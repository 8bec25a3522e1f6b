//! OpenAI-backed provider clients.
//!
//! Two thin HTTP clients over the OpenAI REST API: one for text embeddings,
//! one for transcript classification via chat completions. API keys are
//! wrapped in [`secrecy::SecretString`] and never appear in Debug output or
//! logs.

pub mod classifier;
pub mod embedding;
mod types;

pub use classifier::OpenAiTranscriptClassifier;
pub use embedding::OpenAiEmbedder;

/// Default API endpoint, overridable for tests and proxies.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com";
