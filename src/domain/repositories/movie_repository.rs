use async_trait::async_trait;

use crate::domain::entities::{CatalogSearchHit, Movie, NewMovie};
use crate::domain::repositories::RepositoryError;

/// Local movie catalog, unique per external id
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Find movie by row id
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, RepositoryError>;

    /// Find movie by external catalog id
    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<Movie>, RepositoryError>;

    /// Insert a movie. If a row with the same external id already exists
    /// the existing row is returned.
    async fn create(&self, movie: &NewMovie) -> Result<Movie, RepositoryError>;
}

/// Error from the external movie metadata service
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Movie {0} not found in catalog")]
    NotFound(i64),
    #[error("Catalog service not configured")]
    Unavailable,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// External movie metadata lookup
#[async_trait]
pub trait MovieMetadataSource: Send + Sync {
    /// Fetch full metadata for an external id
    async fn fetch_movie(&self, external_id: i64) -> Result<NewMovie, CatalogError>;

    /// Search the catalog by title
    async fn search(&self, term: &str, page: u32) -> Result<Vec<CatalogSearchHit>, CatalogError>;

    /// Resolve a genre id to its name
    fn genre_name(&self, genre_id: i64) -> Option<String>;
}
