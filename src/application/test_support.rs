//! In-memory collaborators for use case tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::{
    Account, CatalogSearchHit, Invitation, Movie, NewInvitation, NewMovie, Party, PartyMember,
    PartyMovie, PartyMovieDetails, PartySummary, Profile, ProfileStats, WatchStatus, WatchedMovie,
};
use crate::domain::repositories::{
    AccountRepository, AccountUpdate, CatalogError, InvitationRepository, MovieCatalog,
    MovieMetadataSource, PartyRepository, ProfileRepository, RepositoryError, SelectionCandidate,
};

pub fn movie_fixture(id: i64) -> Movie {
    Movie {
        id,
        external_id: 1000 + id,
        title: format!("Movie {}", id),
        release_date: Some("2020-01-01".to_string()),
        overview: String::new(),
        tagline: String::new(),
        poster_url: String::new(),
        trailer_url: String::new(),
        runtime: 100,
        rating: 7.0,
        genres: vec![],
        created_at: 0,
    }
}

#[derive(Default)]
struct PartyState {
    next_id: i64,
    parties: Vec<Party>,
    members: Vec<PartyMember>,
    movies: Vec<PartyMovie>,
    join_code_collisions: usize,
    attempted_codes: Vec<String>,
}

/// Party storage with the same conflict rules as the SQLite schema
#[derive(Default)]
pub struct InMemoryPartyRepository {
    state: Mutex<PartyState>,
}

impl InMemoryPartyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the next `n` join codes as already taken
    pub fn with_join_code_collisions(n: usize) -> Self {
        let repo = Self::new();
        repo.state.lock().unwrap().join_code_collisions = n;
        repo
    }

    pub fn attempted_codes(&self) -> Vec<String> {
        self.state.lock().unwrap().attempted_codes.clone()
    }

    pub fn party_count(&self) -> usize {
        self.state.lock().unwrap().parties.len()
    }

    pub fn seed_party(&self, owner_id: i64, name: &str) -> Party {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let party = Party {
            id: state.next_id,
            name: name.to_string(),
            join_code: format!("code{:02}", state.next_id),
            owner_id,
            created_at: 0,
        };
        state.parties.push(party.clone());
        state.members.push(member(owner_id, party.id, true));
        party
    }

    pub fn seed_member(&self, party_id: i64, member_id: i64) {
        self.state
            .lock()
            .unwrap()
            .members
            .push(member(member_id, party_id, false));
    }

    pub fn seed_movie(&self, party_id: i64, movie_id: i64, added_by: i64) {
        self.state.lock().unwrap().movies.push(PartyMovie {
            party_id,
            movie_id,
            added_by,
            watch_status: WatchStatus::Unwatched,
            watch_date: None,
            created_at: movie_id,
        });
    }

    pub fn movie(&self, party_id: i64, movie_id: i64) -> Option<PartyMovie> {
        self.state
            .lock()
            .unwrap()
            .movies
            .iter()
            .find(|m| m.party_id == party_id && m.movie_id == movie_id)
            .cloned()
    }

    pub fn selected_count(&self, party_id: i64) -> usize {
        self.state
            .lock()
            .unwrap()
            .movies
            .iter()
            .filter(|m| m.party_id == party_id && m.watch_status == WatchStatus::Selected)
            .count()
    }

    /// Put every movie of the party back to unwatched
    pub fn reset_statuses(&self, party_id: i64) {
        for movie in self.state.lock().unwrap().movies.iter_mut() {
            if movie.party_id == party_id {
                movie.watch_status = WatchStatus::Unwatched;
                movie.watch_date = None;
            }
        }
    }
}

fn member(member_id: i64, party_id: i64, owner: bool) -> PartyMember {
    PartyMember {
        member_id,
        party_id,
        first_name: format!("Member{}", member_id),
        last_name: "Test".to_string(),
        owner,
        joined_at: 0,
    }
}

#[async_trait]
impl PartyRepository for InMemoryPartyRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Party>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.parties.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_join_code(&self, code: &str) -> Result<Option<Party>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.parties.iter().find(|p| p.join_code == code).cloned())
    }

    async fn create_party(
        &self,
        owner_id: i64,
        name: &str,
        join_code: &str,
    ) -> Result<Party, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.attempted_codes.push(join_code.to_string());

        if state.join_code_collisions > 0 {
            state.join_code_collisions -= 1;
            return Err(RepositoryError::DuplicateJoinCode);
        }
        if state.parties.iter().any(|p| p.join_code == join_code) {
            return Err(RepositoryError::DuplicateJoinCode);
        }

        state.next_id += 1;
        let party = Party {
            id: state.next_id,
            name: name.to_string(),
            join_code: join_code.to_string(),
            owner_id,
            created_at: 0,
        };
        state.parties.push(party.clone());
        state.members.push(member(owner_id, party.id, true));
        Ok(party)
    }

    async fn create_membership(&self, member_id: i64, party_id: i64) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state
            .members
            .iter()
            .any(|m| m.member_id == member_id && m.party_id == party_id)
        {
            return Err(RepositoryError::DuplicateMembership);
        }
        state.members.push(member(member_id, party_id, false));
        Ok(())
    }

    async fn is_member(&self, party_id: i64, member_id: i64) -> Result<bool, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .any(|m| m.member_id == member_id && m.party_id == party_id))
    }

    async fn get_party_members(&self, party_id: i64) -> Result<Vec<PartyMember>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter(|m| m.party_id == party_id)
            .cloned()
            .collect())
    }

    async fn add_movie_to_party(
        &self,
        party_id: i64,
        movie_id: i64,
        added_by: i64,
    ) -> Result<PartyMovie, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state
            .movies
            .iter()
            .any(|m| m.party_id == party_id && m.movie_id == movie_id)
        {
            return Err(RepositoryError::AlreadyExists(format!("movie {}", movie_id)));
        }
        let movie = PartyMovie {
            party_id,
            movie_id,
            added_by,
            watch_status: WatchStatus::Unwatched,
            watch_date: None,
            created_at: 0,
        };
        state.movies.push(movie.clone());
        Ok(movie)
    }

    async fn find_party_movie(
        &self,
        party_id: i64,
        movie_id: i64,
    ) -> Result<Option<PartyMovie>, RepositoryError> {
        Ok(self.movie(party_id, movie_id))
    }

    async fn find_selected_movie(&self, party_id: i64) -> Result<Option<PartyMovie>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .movies
            .iter()
            .find(|m| m.party_id == party_id && m.watch_status == WatchStatus::Selected)
            .cloned())
    }

    async fn get_party_movies(&self, party_id: i64) -> Result<Vec<PartyMovieDetails>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .movies
            .iter()
            .filter(|m| m.party_id == party_id)
            .map(|m| PartyMovieDetails {
                movie: movie_fixture(m.movie_id),
                added_by: m.added_by,
                added_by_name: format!("Member{} Test", m.added_by),
                watch_status: m.watch_status,
                watch_date: m.watch_date,
                added_on: m.created_at,
            })
            .collect())
    }

    async fn list_unwatched_candidates(
        &self,
        party_id: i64,
    ) -> Result<Vec<SelectionCandidate>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .movies
            .iter()
            .filter(|m| m.party_id == party_id && m.watch_status == WatchStatus::Unwatched)
            .map(|m| SelectionCandidate {
                movie_id: m.movie_id,
                added_by: m.added_by,
            })
            .collect())
    }

    async fn set_movie_status(
        &self,
        party_id: i64,
        movie_id: i64,
        status: WatchStatus,
        now: i64,
    ) -> Result<PartyMovie, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let occupied = state
            .movies
            .iter()
            .any(|m| m.party_id == party_id && m.watch_status == WatchStatus::Selected);

        let movie = state
            .movies
            .iter_mut()
            .find(|m| m.party_id == party_id && m.movie_id == movie_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("movie {}", movie_id)))?;

        let mut next = movie.clone();
        next.transition(status, now)
            .map_err(|e| RepositoryError::InvalidTransition { from: e.from, to: e.to })?;
        if status == WatchStatus::Selected && occupied {
            return Err(RepositoryError::SelectionOccupied);
        }

        *movie = next.clone();
        Ok(next)
    }
}

/// Local movie catalog keyed by external id
#[derive(Default)]
pub struct InMemoryMovieCatalog {
    movies: Mutex<Vec<Movie>>,
}

impl InMemoryMovieCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, movie: Movie) {
        self.movies.lock().unwrap().push(movie);
    }

    pub fn len(&self) -> usize {
        self.movies.lock().unwrap().len()
    }
}

#[async_trait]
impl MovieCatalog for InMemoryMovieCatalog {
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, RepositoryError> {
        Ok(self.movies.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<Movie>, RepositoryError> {
        Ok(self
            .movies
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.external_id == external_id)
            .cloned())
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, RepositoryError> {
        let mut movies = self.movies.lock().unwrap();
        if let Some(existing) = movies.iter().find(|m| m.external_id == movie.external_id) {
            return Ok(existing.clone());
        }
        let stored = Movie {
            id: movies.len() as i64 + 1,
            external_id: movie.external_id,
            title: movie.title.clone(),
            release_date: movie.release_date.clone(),
            overview: movie.overview.clone(),
            tagline: movie.tagline.clone(),
            poster_url: movie.poster_url.clone(),
            trailer_url: movie.trailer_url.clone(),
            runtime: movie.runtime,
            rating: movie.rating,
            genres: movie.genres.clone(),
            created_at: 0,
        };
        movies.push(stored.clone());
        Ok(stored)
    }
}

/// Metadata source answering from a fixed table
#[derive(Default)]
pub struct StubMetadataSource {
    movies: HashMap<i64, NewMovie>,
    genres: HashMap<i64, String>,
    pub fetches: AtomicUsize,
}

impl StubMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, external_id: i64, title: &str) -> Self {
        self.movies.insert(
            external_id,
            NewMovie {
                external_id,
                title: title.to_string(),
                runtime: 120,
                ..NewMovie::default()
            },
        );
        self
    }

    pub fn with_genre(mut self, id: i64, name: &str) -> Self {
        self.genres.insert(id, name.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieMetadataSource for StubMetadataSource {
    async fn fetch_movie(&self, external_id: i64) -> Result<NewMovie, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.movies
            .get(&external_id)
            .cloned()
            .ok_or(CatalogError::NotFound(external_id))
    }

    async fn search(&self, term: &str, _page: u32) -> Result<Vec<CatalogSearchHit>, CatalogError> {
        let term = term.to_lowercase();
        let mut hits: Vec<CatalogSearchHit> = self
            .movies
            .values()
            .filter(|m| m.title.to_lowercase().contains(&term))
            .map(|m| CatalogSearchHit {
                external_id: m.external_id,
                title: m.title.clone(),
                release_date: m.release_date.clone(),
                overview: m.overview.clone(),
                poster_url: m.poster_url.clone(),
                genre_ids: self.genres.keys().copied().collect(),
            })
            .collect();
        hits.sort_by_key(|h| h.external_id);
        Ok(hits)
    }

    fn genre_name(&self, genre_id: i64) -> Option<String> {
        self.genres.get(&genre_id).cloned()
    }
}

/// Which sub-fetch of the profile page a stub should disturb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFetch {
    Profile,
    Stats,
    Parties,
    History,
}

/// Profile reads with optional per-fetch failure or delay
#[derive(Default)]
pub struct StubProfileRepository {
    pub watched: Vec<WatchedMovie>,
    pub parties: Vec<PartySummary>,
    pub invited: Vec<PartySummary>,
    pub failing: Option<ProfileFetch>,
    pub slow: Option<(ProfileFetch, Duration)>,
}

impl StubProfileRepository {
    pub fn with_watched(total: usize) -> Self {
        Self {
            watched: (1..=total as i64)
                .map(|id| WatchedMovie {
                    movie_id: id,
                    title: format!("Movie {}", id),
                    watch_date: Some(1_000 - id),
                    party_name: "Movie Night".to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    async fn disturb(&self, fetch: ProfileFetch) -> Result<(), RepositoryError> {
        if let Some((slow, delay)) = self.slow {
            if slow == fetch {
                tokio::time::sleep(delay).await;
            }
        }
        if self.failing == Some(fetch) {
            return Err(RepositoryError::Database(format!("{:?} query failed", fetch)));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for StubProfileRepository {
    async fn get_profile_by_id(&self, id: i64) -> Result<Profile, RepositoryError> {
        self.disturb(ProfileFetch::Profile).await?;
        Ok(Profile {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            account_id: id,
            email: "ada@example.com".to_string(),
            created_at: 0,
        })
    }

    async fn get_profile_stats(&self, _id: i64) -> Result<ProfileStats, RepositoryError> {
        self.disturb(ProfileFetch::Stats).await?;
        Ok(ProfileStats {
            party_count: self.parties.len() as i64,
            watch_time_minutes: 100 * self.watched.len() as i64,
            movies_watched: self.watched.len() as i64,
        })
    }

    async fn get_parties_for_member(
        &self,
        _id: i64,
        limit: i64,
    ) -> Result<Vec<PartySummary>, RepositoryError> {
        self.disturb(ProfileFetch::Parties).await?;
        Ok(self.parties.iter().take(limit as usize).cloned().collect())
    }

    async fn get_invited_parties_for_member(
        &self,
        _id: i64,
        limit: i64,
    ) -> Result<Vec<PartySummary>, RepositoryError> {
        self.disturb(ProfileFetch::Parties).await?;
        Ok(self.invited.iter().take(limit as usize).cloned().collect())
    }

    async fn get_watched_movies_page(
        &self,
        _id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<WatchedMovie>, RepositoryError> {
        self.disturb(ProfileFetch::History).await?;
        Ok(self
            .watched
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_watched_movies_count(&self, _id: i64) -> Result<i64, RepositoryError> {
        self.disturb(ProfileFetch::History).await?;
        Ok(self.watched.len() as i64)
    }
}

/// Accounts held in memory; emails are unique
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<(Account, Profile)>>,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|(a, _)| a.email == email) {
            return Err(RepositoryError::AlreadyExists(email.to_string()));
        }
        let id = accounts.len() as i64 + 1;
        let account = Account {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: 0,
        };
        let profile = Profile {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            account_id: id,
            email: email.to_string(),
            created_at: 0,
        };
        accounts.push((account, profile.clone()));
        Ok(profile)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Account, Profile)>, RepositoryError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(a, _)| a.email == email)
            .cloned())
    }

    async fn find_by_profile_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<(Account, Profile)>, RepositoryError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(_, p)| p.id == profile_id)
            .cloned())
    }

    async fn update_account(&self, update: &AccountUpdate) -> Result<Profile, RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .iter()
            .any(|(a, p)| a.email == update.email && p.id != update.profile_id)
        {
            return Err(RepositoryError::AlreadyExists(update.email.clone()));
        }
        let (account, profile) = accounts
            .iter_mut()
            .find(|(_, p)| p.id == update.profile_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("profile {}", update.profile_id)))?;

        account.email = update.email.clone();
        if let Some(hash) = &update.password_hash {
            account.password_hash = hash.clone();
        }
        profile.email = update.email.clone();
        profile.first_name = update.first_name.clone();
        profile.last_name = update.last_name.clone();
        Ok(profile.clone())
    }
}

/// Invitations held in memory; one per party and email
#[derive(Default)]
pub struct InMemoryInvitationRepository {
    invitations: Mutex<Vec<Invitation>>,
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn create_invitation(&self, invite: &NewInvitation) -> Result<Invitation, RepositoryError> {
        let mut invitations = self.invitations.lock().unwrap();
        if invitations
            .iter()
            .any(|i| i.party_id == invite.party_id && i.email == invite.email)
        {
            return Err(RepositoryError::AlreadyExists(invite.email.clone()));
        }
        let invitation = Invitation {
            id: invitations.len() as i64 + 1,
            party_id: invite.party_id,
            email: invite.email.clone(),
            profile_id: invite.profile_id,
            invited_by: invite.invited_by,
            created_at: invitations.len() as i64,
        };
        invitations.push(invitation.clone());
        Ok(invitation)
    }

    async fn list_for_party(&self, party_id: i64) -> Result<Vec<Invitation>, RepositoryError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|i| i.party_id == party_id)
            .cloned()
            .collect())
    }
}
