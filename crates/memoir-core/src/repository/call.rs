//! Call record repository trait definition.

use memoir_types::call::CallRecord;
use memoir_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for reading call history.
///
/// Call records are written by the telephony layer; this subsystem only
/// reads them.
pub trait CallRepository: Send + Sync {
    /// The `limit` most recent calls for a user, newest first.
    fn recent_calls(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<CallRecord>, RepositoryError>> + Send;

    /// Fetch one call by id.
    fn get_by_id(
        &self,
        call_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<CallRecord>, RepositoryError>> + Send;
}
