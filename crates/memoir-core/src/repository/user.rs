//! User repository trait definition.

use memoir_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for enumerating users.
///
/// The nightly aggregator uses this to build its work queue.
pub trait UserRepository: Send + Sync {
    /// Ids of active users, capped at `limit`.
    fn active_user_ids(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Uuid>, RepositoryError>> + Send;
}
