//! Promise record repository trait definition.

use memoir_types::error::RepositoryError;
use memoir_types::promise::PromiseRecord;
use uuid::Uuid;

/// Repository trait for reading promise history.
pub trait PromiseRepository: Send + Sync {
    /// The `limit` most recent promises for a user, newest first.
    fn recent_promises(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<PromiseRecord>, RepositoryError>> + Send;
}
