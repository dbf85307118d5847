use serde::{Deserialize, Serialize};

/// Poster shown when the catalog has no artwork for a movie
pub const PLACEHOLDER_POSTER_URL: &str = "https://placehold.co/270x400?text=No+Poster+Available";

/// Movie entity - canonical metadata, immutable once stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub external_id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: String,
    pub tagline: String,
    pub poster_url: String,
    pub trailer_url: String,
    /// Runtime in minutes
    pub runtime: i64,
    pub rating: f64,
    pub genres: Vec<String>,
    pub created_at: i64,
}

/// Attributes of a movie not yet stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub external_id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: String,
    pub tagline: String,
    pub poster_url: String,
    pub trailer_url: String,
    pub runtime: i64,
    pub rating: f64,
    pub genres: Vec<String>,
}

/// How a caller refers to a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieRef {
    /// Row id of a movie already in the catalog
    Internal(i64),
    /// Id in the external metadata catalog
    External(i64),
}

/// A search hit from the external catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSearchHit {
    pub external_id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: String,
    pub poster_url: String,
    pub genre_ids: Vec<i64>,
}
