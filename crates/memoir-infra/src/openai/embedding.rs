//! OpenAiEmbedder -- concrete [`Embedder`] implementation over the OpenAI
//! embeddings endpoint.
//!
//! Transient failures (timeouts, 429, 5xx) are retried with jittered
//! exponential backoff; auth and client errors fail immediately.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use memoir_core::embedding::Embedder;
use memoir_core::retry::RetryPolicy;
use memoir_types::error::EmbeddingError;

use super::types::{EmbeddingRequest, EmbeddingResponse};
use super::DEFAULT_BASE_URL;

const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSION: usize = 1536;

/// OpenAI embedding client.
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing request headers.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dimension: usize,
    retry: RetryPolicy,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| EmbeddingError::Request(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
            retry: RetryPolicy::default(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn request_embeddings(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let url = format!("{}/v1/embeddings", self.base_url);

        let mut attempt = 1u32;
        loop {
            match self.send_once(&url, &body).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) if is_transient(&e) && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "embedding request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        body: &EmbeddingRequest<'_>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(format!("http request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(format!("invalid json: {e}")))?;

        // The API does not guarantee response order; sort by index.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

fn is_transient(error: &EmbeddingError) -> bool {
    match error {
        EmbeddingError::Request(_) => true,
        EmbeddingError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

impl Embedder for OpenAiEmbedder {
    #[tracing::instrument(skip_all, fields(
        gen_ai.operation.name = "embeddings",
        gen_ai.provider.name = "openai",
        gen_ai.request.model = %self.model,
        batch_size = texts.len(),
    ))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self.request_embeddings(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::BatchMismatch {
                sent: texts.len(),
                received: embeddings.len(),
            });
        }
        Ok(embeddings)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::MalformedResponse("empty embedding list".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
