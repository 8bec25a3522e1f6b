use thiserror::Error;

/// Errors from repository operations (used by trait definitions in memoir-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from embedding generation.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("embedding provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("embedding batch size mismatch: sent {sent}, received {received}")]
    BatchMismatch { sent: usize, received: usize },
}

/// Errors from transcript classification.
///
/// Callers treat these as "zero extracted items" for the affected call;
/// classification failure is never fatal to a batch.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classification request failed: {0}")]
    Request(String),

    #[error("classification provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed classification response: {0}")]
    MalformedResponse(String),
}

/// Errors surfaced by the memory service and its consumers.
#[derive(Debug, Error)]
pub enum MemoryServiceError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_from_embedding() {
        let err: MemoryServiceError = EmbeddingError::BatchMismatch {
            sent: 3,
            received: 2,
        }
        .into();
        assert!(err.to_string().contains("batch size mismatch"));
    }

    #[test]
    fn test_repository_error_messages() {
        assert_eq!(RepositoryError::NotFound.to_string(), "entity not found");
        assert_eq!(
            RepositoryError::Conflict("duplicate".into()).to_string(),
            "conflict: duplicate"
        );
    }
}
