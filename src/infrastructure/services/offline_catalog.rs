use async_trait::async_trait;

use crate::domain::entities::{CatalogSearchHit, NewMovie};
use crate::domain::repositories::{CatalogError, MovieMetadataSource};

/// Metadata source used when no catalog API key is configured.
/// Only movies already stored locally can be added to parties.
pub struct OfflineMetadataSource;

#[async_trait]
impl MovieMetadataSource for OfflineMetadataSource {
    async fn fetch_movie(&self, _external_id: i64) -> Result<NewMovie, CatalogError> {
        Err(CatalogError::Unavailable)
    }

    async fn search(&self, _term: &str, _page: u32) -> Result<Vec<CatalogSearchHit>, CatalogError> {
        Err(CatalogError::Unavailable)
    }

    fn genre_name(&self, _genre_id: i64) -> Option<String> {
        None
    }
}
