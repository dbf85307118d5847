use async_trait::async_trait;

use crate::domain::entities::{PartySummary, Profile, ProfileStats, WatchedMovie};
use crate::domain::repositories::RepositoryError;

/// Read paths behind a member's profile page
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get profile by ID
    async fn get_profile_by_id(&self, id: i64) -> Result<Profile, RepositoryError>;

    /// Party count, total watch time and movies watched
    async fn get_profile_stats(&self, id: i64) -> Result<ProfileStats, RepositoryError>;

    /// Parties the member belongs to, most recent first
    async fn get_parties_for_member(
        &self,
        id: i64,
        limit: i64,
    ) -> Result<Vec<PartySummary>, RepositoryError>;

    /// Parties the member was invited to by profile or by current email and
    /// has not joined, most recently invited first
    async fn get_invited_parties_for_member(
        &self,
        id: i64,
        limit: i64,
    ) -> Result<Vec<PartySummary>, RepositoryError>;

    /// Watched movies across the member's parties, newest first
    async fn get_watched_movies_page(
        &self,
        id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<WatchedMovie>, RepositoryError>;

    /// Total number of watched movies across the member's parties
    async fn get_watched_movies_count(&self, id: i64) -> Result<i64, RepositoryError>;
}
