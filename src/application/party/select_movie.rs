use std::sync::{Arc, Mutex};

use rand_chacha::ChaCha8Rng;

use crate::domain::entities::{PartyMovie, WatchStatus};
use crate::domain::repositories::{PartyRepository, RepositoryError};
use crate::domain::services::selection_service::{pick_fair, selection_rng};

/// Select movie input
pub struct SelectMovieInput {
    pub party_id: i64,
    pub member_id: i64,
}

/// Pick the party's next movie with the two-stage fair draw
pub struct SelectMovieForParty<P: PartyRepository> {
    party_repo: Arc<P>,
    rng: Mutex<ChaCha8Rng>,
}

impl<P: PartyRepository> SelectMovieForParty<P> {
    pub fn new(party_repo: Arc<P>) -> Self {
        Self {
            party_repo,
            rng: Mutex::new(selection_rng(None)),
        }
    }

    /// Reproducible picks for a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(selection_rng(Some(seed)));
        self
    }

    pub async fn execute(&self, input: SelectMovieInput) -> Result<PartyMovie, SelectMovieError> {
        self.party_repo
            .find_by_id(input.party_id)
            .await?
            .ok_or(SelectMovieError::PartyNotFound)?;

        if !self
            .party_repo
            .is_member(input.party_id, input.member_id)
            .await?
        {
            return Err(SelectMovieError::NotAMember);
        }

        if let Some(current) = self.party_repo.find_selected_movie(input.party_id).await? {
            return Err(SelectMovieError::AlreadySelected(current));
        }

        let candidates = self
            .party_repo
            .list_unwatched_candidates(input.party_id)
            .await?;

        let pick = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            pick_fair(&candidates, &mut *rng)
        }
        .ok_or(SelectMovieError::NoCandidates)?;

        tracing::debug!(
            party_id = input.party_id,
            movie_id = pick.movie_id,
            contributor = pick.added_by,
            candidates = candidates.len(),
            "Picked next movie"
        );

        let now = chrono::Utc::now().timestamp();
        match self
            .party_repo
            .set_movie_status(input.party_id, pick.movie_id, WatchStatus::Selected, now)
            .await
        {
            Ok(selected) => Ok(selected),
            Err(RepositoryError::SelectionOccupied) => {
                // Someone else selected between our check and the write
                match self.party_repo.find_selected_movie(input.party_id).await? {
                    Some(current) => Err(SelectMovieError::AlreadySelected(current)),
                    None => Err(RepositoryError::SelectionOccupied.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectMovieError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Not a member of this party")]
    NotAMember,
    #[error("Party already has movie {} selected", .0.movie_id)]
    AlreadySelected(PartyMovie),
    #[error("No unwatched movies to select from")]
    NoCandidates,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryPartyRepository;

    fn setup() -> (Arc<InMemoryPartyRepository>, i64) {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");
        repo.seed_member(party.id, 2);
        (repo, party.id)
    }

    fn input(party_id: i64) -> SelectMovieInput {
        SelectMovieInput {
            party_id,
            member_id: 1,
        }
    }

    #[tokio::test]
    async fn test_selects_exactly_one_movie() {
        let (repo, party_id) = setup();
        repo.seed_movie(party_id, 10, 1);
        repo.seed_movie(party_id, 11, 1);
        repo.seed_movie(party_id, 20, 2);

        let selected = SelectMovieForParty::new(repo.clone())
            .with_seed(7)
            .execute(input(party_id))
            .await
            .unwrap();

        assert_eq!(selected.watch_status, WatchStatus::Selected);
        assert_eq!(selected.watch_date, None);
        assert_eq!(repo.selected_count(party_id), 1);
    }

    #[tokio::test]
    async fn test_empty_party_has_no_candidates() {
        let (repo, party_id) = setup();
        let err = SelectMovieForParty::new(repo)
            .execute(input(party_id))
            .await
            .unwrap_err();

        assert!(matches!(err, SelectMovieError::NoCandidates));
    }

    #[tokio::test]
    async fn test_existing_selection_is_kept() {
        let (repo, party_id) = setup();
        repo.seed_movie(party_id, 10, 1);
        repo.seed_movie(party_id, 20, 2);
        let use_case = SelectMovieForParty::new(repo.clone()).with_seed(3);

        let first = use_case.execute(input(party_id)).await.unwrap();
        let err = use_case.execute(input(party_id)).await.unwrap_err();

        match err {
            SelectMovieError::AlreadySelected(current) => {
                assert_eq!(current.movie_id, first.movie_id)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.selected_count(party_id), 1);
    }

    #[tokio::test]
    async fn test_outsider_cannot_select() {
        let (repo, party_id) = setup();
        repo.seed_movie(party_id, 10, 1);

        let err = SelectMovieForParty::new(repo)
            .execute(SelectMovieInput {
                party_id,
                member_id: 42,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SelectMovieError::NotAMember));
    }

    #[tokio::test]
    async fn test_picks_are_fair_per_contributor() {
        let (repo, party_id) = setup();
        for movie_id in 1..=10 {
            repo.seed_movie(party_id, movie_id, 1);
        }
        repo.seed_movie(party_id, 100, 2);

        let use_case = SelectMovieForParty::new(repo.clone()).with_seed(42);
        let trials = 2_000;
        let mut by_member_one = 0;
        for _ in 0..trials {
            let selected = use_case.execute(input(party_id)).await.unwrap();
            if selected.added_by == 1 {
                by_member_one += 1;
            }
            repo.reset_statuses(party_id);
        }

        let share = by_member_one as f64 / trials as f64;
        assert!((0.44..=0.56).contains(&share), "member one share was {share}");
    }
}
