use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::dto::{api_error, ApiError};
use crate::api::AppState;
use crate::application::movies::{MovieSearchResult, SearchError, SearchMovies};
use crate::domain::repositories::CatalogError;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub page: u32,
    pub results: Vec<MovieSearchResult>,
}

/// GET /api/movies/search?q=&page= - Search the movie catalog
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let term = query.q.unwrap_or_default();

    let results = SearchMovies::new(state.metadata.clone())
        .execute(&term, page)
        .await
        .map_err(|e| match e {
            SearchError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            SearchError::Catalog(CatalogError::Unavailable) => api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "CATALOG_UNAVAILABLE",
                "Movie search is not configured",
            ),
            SearchError::Catalog(e) => {
                tracing::warn!("Movie search failed: {}", e);
                api_error(StatusCode::BAD_GATEWAY, "CATALOG_ERROR", "Movie search failed")
            }
        })?;

    Ok(Json(SearchResponse {
        success: true,
        page,
        results,
    }))
}
