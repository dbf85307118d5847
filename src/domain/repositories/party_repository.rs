use async_trait::async_trait;

use crate::domain::entities::{
    Party, PartyMember, PartyMovie, PartyMovieDetails, WatchStatus,
};
use crate::domain::repositories::RepositoryError;

/// One unwatched movie and the member who added it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCandidate {
    pub movie_id: i64,
    pub added_by: i64,
}

/// Party repository trait
#[async_trait]
pub trait PartyRepository: Send + Sync {
    // ========== Party operations ==========

    /// Find party by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Party>, RepositoryError>;

    /// Find party by join code
    async fn find_by_join_code(&self, code: &str) -> Result<Option<Party>, RepositoryError>;

    /// Insert the party and the owner's membership in one transaction.
    /// A join code collision yields `RepositoryError::DuplicateJoinCode`
    /// and leaves nothing behind.
    async fn create_party(
        &self,
        owner_id: i64,
        name: &str,
        join_code: &str,
    ) -> Result<Party, RepositoryError>;

    // ========== Membership operations ==========

    /// Add member to party. A repeated pair yields
    /// `RepositoryError::DuplicateMembership`.
    async fn create_membership(&self, member_id: i64, party_id: i64) -> Result<(), RepositoryError>;

    /// Check if member belongs to party
    async fn is_member(&self, party_id: i64, member_id: i64) -> Result<bool, RepositoryError>;

    /// Get party members, oldest first
    async fn get_party_members(&self, party_id: i64) -> Result<Vec<PartyMember>, RepositoryError>;

    // ========== Party movie operations ==========

    /// Add a movie to the party as `unwatched`. A movie already on the
    /// party yields `RepositoryError::AlreadyExists`.
    async fn add_movie_to_party(
        &self,
        party_id: i64,
        movie_id: i64,
        added_by: i64,
    ) -> Result<PartyMovie, RepositoryError>;

    /// Find a party movie
    async fn find_party_movie(
        &self,
        party_id: i64,
        movie_id: i64,
    ) -> Result<Option<PartyMovie>, RepositoryError>;

    /// Get the currently selected movie, if any
    async fn find_selected_movie(&self, party_id: i64) -> Result<Option<PartyMovie>, RepositoryError>;

    /// Get all movies on the party with metadata and contributor names
    async fn get_party_movies(&self, party_id: i64) -> Result<Vec<PartyMovieDetails>, RepositoryError>;

    /// Get every unwatched movie with its contributor
    async fn list_unwatched_candidates(
        &self,
        party_id: i64,
    ) -> Result<Vec<SelectionCandidate>, RepositoryError>;

    /// Move a party movie to `status` in one transaction. The current status
    /// is re-read and the move rejected with `InvalidTransition` when not
    /// forward; moving to `selected` while another movie holds the slot is
    /// rejected with `SelectionOccupied`.
    async fn set_movie_status(
        &self,
        party_id: i64,
        movie_id: i64,
        status: WatchStatus,
        now: i64,
    ) -> Result<PartyMovie, RepositoryError>;
}
