use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::WatchedMovie;
use crate::domain::repositories::{ProfileRepository, RepositoryError};
use crate::domain::value_objects::PageInfo;

/// One page of a member's watch history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchPage {
    pub movies: Vec<WatchedMovie>,
    pub current_page: i64,
    pub total_pages: i64,
}

/// Load one page of watched movies along with the page count.
/// The page and the count are read concurrently.
pub(crate) async fn load_watch_page<R: ProfileRepository + ?Sized>(
    profile_repo: &R,
    member_id: i64,
    page: PageInfo,
) -> Result<WatchPage, RepositoryError> {
    let (movies, total) = tokio::try_join!(
        profile_repo.get_watched_movies_page(member_id, page.offset(), page.size()),
        profile_repo.get_watched_movies_count(member_id),
    )?;

    Ok(WatchPage {
        movies,
        current_page: page.page(),
        total_pages: page.total_pages(total),
    })
}

/// Watch history pager, usable without the full profile page
pub struct GetWatchPaginatedHistory<R: ProfileRepository> {
    profile_repo: Arc<R>,
}

impl<R: ProfileRepository> GetWatchPaginatedHistory<R> {
    pub fn new(profile_repo: Arc<R>) -> Self {
        Self { profile_repo }
    }

    pub async fn execute(&self, member_id: i64, page: PageInfo) -> Result<WatchPage, WatchHistoryError> {
        Ok(load_watch_page(self.profile_repo.as_ref(), member_id, page).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WatchHistoryError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
