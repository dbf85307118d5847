use std::sync::Arc;

use crate::domain::entities::{PartyMovie, WatchStatus};
use crate::domain::repositories::{PartyRepository, RepositoryError};

/// Mark watched input
pub struct MarkWatchedInput {
    pub party_id: i64,
    pub member_id: i64,
    pub movie_id: i64,
}

/// Move a party movie to watched and stamp the watch date.
/// Unwatched movies may skip the selected stage.
pub struct MarkMovieAsWatched<P: PartyRepository> {
    party_repo: Arc<P>,
}

impl<P: PartyRepository> MarkMovieAsWatched<P> {
    pub fn new(party_repo: Arc<P>) -> Self {
        Self { party_repo }
    }

    pub async fn execute(&self, input: MarkWatchedInput) -> Result<PartyMovie, MarkWatchedError> {
        self.party_repo
            .find_by_id(input.party_id)
            .await?
            .ok_or(MarkWatchedError::PartyNotFound)?;

        if !self
            .party_repo
            .is_member(input.party_id, input.member_id)
            .await?
        {
            return Err(MarkWatchedError::NotAMember);
        }

        let current = self
            .party_repo
            .find_party_movie(input.party_id, input.movie_id)
            .await?
            .ok_or(MarkWatchedError::MovieNotOnParty)?;
        if !current.watch_status.can_transition_to(WatchStatus::Watched) {
            return Err(MarkWatchedError::InvalidTransition(current.watch_status));
        }

        // The status may still move between the read and the write
        let now = chrono::Utc::now().timestamp();
        let watched = self
            .party_repo
            .set_movie_status(input.party_id, input.movie_id, WatchStatus::Watched, now)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => MarkWatchedError::MovieNotOnParty,
                RepositoryError::InvalidTransition { from, .. } => {
                    MarkWatchedError::InvalidTransition(from)
                }
                other => other.into(),
            })?;

        tracing::info!(
            party_id = input.party_id,
            movie_id = input.movie_id,
            "Movie marked watched"
        );

        Ok(watched)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarkWatchedError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Not a member of this party")]
    NotAMember,
    #[error("Movie is not on this party")]
    MovieNotOnParty,
    #[error("Movie cannot be marked watched from {0}")]
    InvalidTransition(WatchStatus),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryPartyRepository;

    fn input(party_id: i64, movie_id: i64) -> MarkWatchedInput {
        MarkWatchedInput {
            party_id,
            member_id: 1,
            movie_id,
        }
    }

    #[tokio::test]
    async fn test_selected_movie_becomes_watched_with_date() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");
        repo.seed_movie(party.id, 10, 1);
        repo.set_movie_status(party.id, 10, WatchStatus::Selected, 5)
            .await
            .unwrap();

        let watched = MarkMovieAsWatched::new(repo.clone())
            .execute(input(party.id, 10))
            .await
            .unwrap();

        assert_eq!(watched.watch_status, WatchStatus::Watched);
        assert!(watched.watch_date.is_some());
        assert_eq!(repo.selected_count(party.id), 0);
    }

    #[tokio::test]
    async fn test_unwatched_movie_can_skip_selection() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");
        repo.seed_movie(party.id, 10, 1);

        let watched = MarkMovieAsWatched::new(repo)
            .execute(input(party.id, 10))
            .await
            .unwrap();

        assert_eq!(watched.watch_status, WatchStatus::Watched);
    }

    #[tokio::test]
    async fn test_watched_is_terminal() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");
        repo.seed_movie(party.id, 10, 1);
        let use_case = MarkMovieAsWatched::new(repo.clone());

        let first = use_case.execute(input(party.id, 10)).await.unwrap();
        let err = use_case.execute(input(party.id, 10)).await.unwrap_err();

        assert!(matches!(
            err,
            MarkWatchedError::InvalidTransition(WatchStatus::Watched)
        ));
        assert_eq!(repo.movie(party.id, 10).unwrap().watch_date, first.watch_date);
    }

    #[tokio::test]
    async fn test_movie_not_on_party() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");

        let err = MarkMovieAsWatched::new(repo)
            .execute(input(party.id, 77))
            .await
            .unwrap_err();

        assert!(matches!(err, MarkWatchedError::MovieNotOnParty));
    }

    #[tokio::test]
    async fn test_movie_on_another_party_is_not_found() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let ours = repo.seed_party(1, "Movie Night");
        let theirs = repo.seed_party(2, "Other Night");
        repo.seed_movie(theirs.id, 10, 2);

        let err = MarkMovieAsWatched::new(repo.clone())
            .execute(input(ours.id, 10))
            .await
            .unwrap_err();

        assert!(matches!(err, MarkWatchedError::MovieNotOnParty));
        assert_eq!(
            repo.movie(theirs.id, 10).unwrap().watch_status,
            WatchStatus::Unwatched
        );
    }
}
