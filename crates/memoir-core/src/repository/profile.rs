//! Pattern profile repository trait definition.

use memoir_types::error::RepositoryError;
use memoir_types::profile::PatternProfile;
use uuid::Uuid;

/// Repository trait for per-user pattern profiles.
///
/// Profiles are whole-row upserts: the nightly aggregator always replaces
/// the previous profile, so there is no partial-update operation.
pub trait ProfileRepository: Send + Sync {
    fn upsert(
        &self,
        user_id: &Uuid,
        profile: &PatternProfile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<PatternProfile>, RepositoryError>> + Send;
}
