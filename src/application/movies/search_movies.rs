use std::sync::Arc;

use serde::Serialize;

use crate::domain::repositories::{CatalogError, MovieMetadataSource};

/// A search hit with genre ids resolved to names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchResult {
    pub external_id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: String,
    pub poster_url: String,
    pub genres: Vec<String>,
}

/// Search the external catalog by title
pub struct SearchMovies<S: MovieMetadataSource + ?Sized> {
    metadata: Arc<S>,
}

impl<S: MovieMetadataSource + ?Sized> SearchMovies<S> {
    pub fn new(metadata: Arc<S>) -> Self {
        Self { metadata }
    }

    pub async fn execute(&self, term: &str, page: u32) -> Result<Vec<MovieSearchResult>, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::Validation("Search term is required".into()));
        }

        let hits = self.metadata.search(term, page.max(1)).await?;

        Ok(hits
            .into_iter()
            .map(|hit| MovieSearchResult {
                // Unknown genre ids are dropped
                genres: hit
                    .genre_ids
                    .iter()
                    .filter_map(|id| self.metadata.genre_name(*id))
                    .collect(),
                external_id: hit.external_id,
                title: hit.title,
                release_date: hit.release_date,
                overview: hit.overview,
                poster_url: hit.poster_url,
            })
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
