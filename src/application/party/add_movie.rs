use std::sync::Arc;

use crate::application::movies::{GetMovieError, GetOrCreateMovie};
use crate::domain::entities::{Movie, MovieRef, PartyMovie};
use crate::domain::repositories::{
    CatalogError, MovieCatalog, MovieMetadataSource, PartyRepository, RepositoryError,
};

/// Add movie input
pub struct AddMovieInput {
    pub party_id: i64,
    pub member_id: i64,
    pub movie: MovieRef,
}

/// Add movie output
#[derive(Debug)]
pub struct AddMovieOutput {
    pub movie: Movie,
    pub party_movie: PartyMovie,
}

/// Add a movie to a party's list as unwatched
pub struct AddMovie<P: PartyRepository, C: MovieCatalog, S: MovieMetadataSource + ?Sized> {
    party_repo: Arc<P>,
    movies: GetOrCreateMovie<C, S>,
}

impl<P: PartyRepository, C: MovieCatalog, S: MovieMetadataSource + ?Sized> AddMovie<P, C, S> {
    pub fn new(party_repo: Arc<P>, catalog: Arc<C>, metadata: Arc<S>) -> Self {
        Self {
            party_repo,
            movies: GetOrCreateMovie::new(catalog, metadata),
        }
    }

    pub async fn execute(&self, input: AddMovieInput) -> Result<AddMovieOutput, AddMovieError> {
        self.party_repo
            .find_by_id(input.party_id)
            .await?
            .ok_or(AddMovieError::PartyNotFound)?;

        if !self
            .party_repo
            .is_member(input.party_id, input.member_id)
            .await?
        {
            return Err(AddMovieError::NotAMember);
        }

        let movie = self.movies.execute(input.movie).await?;

        let party_movie = match self
            .party_repo
            .add_movie_to_party(input.party_id, movie.id, input.member_id)
            .await
        {
            Ok(party_movie) => party_movie,
            Err(RepositoryError::AlreadyExists(_)) => return Err(AddMovieError::MovieAlreadyAdded),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            party_id = input.party_id,
            movie_id = movie.id,
            added_by = input.member_id,
            "Movie added to party"
        );

        Ok(AddMovieOutput { movie, party_movie })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AddMovieError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Not a member of this party")]
    NotAMember,
    #[error("Movie not found")]
    MovieNotFound,
    #[error("Movie is already on this party")]
    MovieAlreadyAdded,
    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<GetMovieError> for AddMovieError {
    fn from(err: GetMovieError) -> Self {
        match err {
            GetMovieError::MovieNotFound => AddMovieError::MovieNotFound,
            GetMovieError::Catalog(e) => AddMovieError::Catalog(e),
            GetMovieError::Repository(e) => AddMovieError::Repository(e),
        }
    }
}
