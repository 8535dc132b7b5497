//! Speaker repository trait definition.

use lingochat_types::error::RepositoryError;
use lingochat_types::speaker::Speaker;

/// Repository trait for the speaker catalog.
///
/// The catalog is read-only to the conversation service; `upsert` exists
/// for seeding only.
pub trait SpeakerRepository: Send + Sync {
    /// Get a speaker by catalog id.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Speaker>, RepositoryError>> + Send;

    /// Get every speaker whose id is in `ids`. Unknown ids are skipped.
    fn find_by_ids(
        &self,
        ids: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Speaker>, RepositoryError>> + Send;

    /// List the full catalog ordered by id.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Speaker>, RepositoryError>> + Send;

    /// Insert a speaker or replace the one with the same id.
    fn upsert(
        &self,
        speaker: &Speaker,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
