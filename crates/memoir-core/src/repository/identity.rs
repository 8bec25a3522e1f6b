//! Identity record repository trait definition.

use memoir_types::error::RepositoryError;
use memoir_types::identity::IdentityRecord;
use uuid::Uuid;

/// Repository trait for reading the onboarding identity baseline.
///
/// A user without an identity record yields `Ok(None)`, never an error --
/// downstream consumers treat that as "no baseline yet".
pub trait IdentityRepository: Send + Sync {
    fn get_by_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<IdentityRecord>, RepositoryError>> + Send;
}
