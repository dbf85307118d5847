//! TMDB metadata client
//!
//! Movie details, trailers and title search from The Movie Database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::entities::{CatalogSearchHit, NewMovie, PLACEHOLDER_POSTER_URL};
use crate::domain::repositories::{CatalogError, MovieMetadataSource};

use super::genre_cache::{Genre, GenreCache};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const TRAILER_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// TMDB client configuration
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    runtime: Option<i64>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Full poster URL, or the placeholder when the catalog has none
fn poster_url(poster_path: Option<&str>) -> String {
    match poster_path {
        Some(path) if !path.is_empty() => format!("{}{}", POSTER_BASE_URL, path),
        _ => PLACEHOLDER_POSTER_URL.to_string(),
    }
}

/// First video of type "Trailer"
fn trailer_url(videos: &[Video]) -> String {
    videos
        .iter()
        .find(|v| v.kind == "Trailer")
        .map(|v| format!("{}{}", TRAILER_BASE_URL, v.key))
        .unwrap_or_default()
}

/// Empty release dates from the catalog mean "unknown"
fn release_date(raw: Option<String>) -> Option<String> {
    raw.filter(|d| !d.is_empty())
}

impl TmdbMovie {
    fn into_new_movie(self, trailer_url: String) -> NewMovie {
        NewMovie {
            external_id: self.id,
            poster_url: poster_url(self.poster_path.as_deref()),
            title: self.title,
            release_date: release_date(self.release_date),
            overview: self.overview,
            tagline: self.tagline.unwrap_or_default(),
            trailer_url,
            runtime: self.runtime.unwrap_or(0),
            rating: self.vote_average,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
        }
    }

    fn into_search_hit(self) -> CatalogSearchHit {
        CatalogSearchHit {
            external_id: self.id,
            poster_url: poster_url(self.poster_path.as_deref()),
            title: self.title,
            release_date: release_date(self.release_date),
            overview: self.overview,
            genre_ids: self.genre_ids,
        }
    }
}

/// TMDB implementation of MovieMetadataSource
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
    genres: Arc<GenreCache>,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig, genres: Arc<GenreCache>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        Ok(Self {
            client,
            config,
            genres,
        })
    }

    /// Build a client and fill its genre cache. A failed genre fetch leaves
    /// the cache empty; search results then carry no genre names.
    pub async fn connect(config: TmdbConfig) -> Result<Self, CatalogError> {
        let bootstrap = Self::new(config.clone(), Arc::new(GenreCache::default()))?;

        let genres = match bootstrap.fetch_genres().await {
            Ok(genres) => {
                info!("Loaded {} movie genres", genres.len());
                genres
            }
            Err(e) => {
                warn!("Failed to load movie genres: {}", e);
                GenreCache::default()
            }
        };

        Ok(Self {
            genres: Arc::new(genres),
            ..bootstrap
        })
    }

    pub async fn fetch_genres(&self) -> Result<GenreCache, CatalogError> {
        let list: GenreList = self
            .get_json("/genre/movie/list", &[("language", "en")])
            .await?
            .ok_or_else(|| CatalogError::InvalidResponse("genre list not found".into()))?;
        Ok(GenreCache::new(list.genres))
    }

    /// GET a JSON document; a 404 is `Ok(None)`
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("Calling TMDB API: {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Http(format!("{} returned {}", path, status)));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MovieMetadataSource for TmdbClient {
    async fn fetch_movie(&self, external_id: i64) -> Result<NewMovie, CatalogError> {
        let movie: TmdbMovie = self
            .get_json(&format!("/movie/{}", external_id), &[])
            .await?
            .ok_or(CatalogError::NotFound(external_id))?;

        // A movie without a reachable trailer is still usable
        let trailer = match self
            .get_json::<VideoList>(&format!("/movie/{}/videos", external_id), &[])
            .await
        {
            Ok(Some(videos)) => trailer_url(&videos.results),
            Ok(None) => String::new(),
            Err(e) => {
                warn!(external_id, "Failed to load trailers: {}", e);
                String::new()
            }
        };

        Ok(movie.into_new_movie(trailer))
    }

    async fn search(&self, term: &str, page: u32) -> Result<Vec<CatalogSearchHit>, CatalogError> {
        let page = page.to_string();
        let response: SearchResponse = self
            .get_json("/search/movie", &[("query", term), ("page", page.as_str())])
            .await?
            .unwrap_or(SearchResponse { results: vec![] });

        Ok(response
            .results
            .into_iter()
            .map(TmdbMovie::into_search_hit)
            .collect())
    }

    fn genre_name(&self, genre_id: i64) -> Option<String> {
        self.genres.name(genre_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_falls_back_to_placeholder() {
        assert_eq!(
            poster_url(Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(poster_url(Some("")), PLACEHOLDER_POSTER_URL);
        assert_eq!(poster_url(None), PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn test_trailer_url_uses_first_trailer() {
        let videos: VideoList = serde_json::from_str(
            r#"{"results":[
                {"key":"teaser1","type":"Teaser"},
                {"key":"vKQi3bBA1y8","type":"Trailer"},
                {"key":"other","type":"Trailer"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            trailer_url(&videos.results),
            "https://www.youtube.com/watch?v=vKQi3bBA1y8"
        );
        assert_eq!(trailer_url(&[]), "");
    }

    #[test]
    fn test_movie_details_conversion() {
        let movie: TmdbMovie = serde_json::from_str(
            r#"{
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-30",
                "overview": "Neo learns the truth.",
                "tagline": "Welcome to the Real World.",
                "poster_path": null,
                "runtime": 136,
                "vote_average": 8.2,
                "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
            }"#,
        )
        .unwrap();

        let new_movie = movie.into_new_movie("https://www.youtube.com/watch?v=x".to_string());

        assert_eq!(new_movie.external_id, 603);
        assert_eq!(new_movie.runtime, 136);
        assert_eq!(new_movie.poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(new_movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(new_movie.release_date.as_deref(), Some("1999-03-30"));
    }

    #[test]
    fn test_search_hit_keeps_genre_ids() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"page":1,"results":[{"id":13,"title":"Forrest Gump","release_date":"","genre_ids":[35,18]}]}"#,
        )
        .unwrap();

        let hit = response.results.into_iter().next().unwrap().into_search_hit();
        assert_eq!(hit.genre_ids, vec![35, 18]);
        assert_eq!(hit.release_date, None);
    }
}
