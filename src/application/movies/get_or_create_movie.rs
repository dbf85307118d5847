use std::sync::Arc;

use crate::domain::entities::{Movie, MovieRef};
use crate::domain::repositories::{CatalogError, MovieCatalog, MovieMetadataSource, RepositoryError};

/// Resolve a movie reference to a stored movie, fetching metadata and storing
/// it on first use of an external id
pub struct GetOrCreateMovie<C: MovieCatalog, S: MovieMetadataSource + ?Sized> {
    catalog: Arc<C>,
    metadata: Arc<S>,
}

impl<C: MovieCatalog, S: MovieMetadataSource + ?Sized> GetOrCreateMovie<C, S> {
    pub fn new(catalog: Arc<C>, metadata: Arc<S>) -> Self {
        Self { catalog, metadata }
    }

    pub async fn execute(&self, movie: MovieRef) -> Result<Movie, GetMovieError> {
        match movie {
            MovieRef::Internal(id) => self
                .catalog
                .find_by_id(id)
                .await?
                .ok_or(GetMovieError::MovieNotFound),
            MovieRef::External(external_id) => {
                if let Some(existing) = self.catalog.find_by_external_id(external_id).await? {
                    return Ok(existing);
                }

                let attrs = self
                    .metadata
                    .fetch_movie(external_id)
                    .await
                    .map_err(|e| match e {
                        CatalogError::NotFound(_) => GetMovieError::MovieNotFound,
                        other => GetMovieError::Catalog(other),
                    })?;

                tracing::debug!(external_id, title = %attrs.title, "Storing new movie");
                Ok(self.catalog.create(&attrs).await?)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetMovieError {
    #[error("Movie not found")]
    MovieNotFound,
    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
