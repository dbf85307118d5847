//! Profile page aggregation
//!
//! The profile page is assembled from four independent reads: the profile
//! itself, its derived stats, the member's parties (joined and invited to)
//! and the first page of watch history. They run concurrently under one deadline. The first read
//! to fail decides the result and the remaining reads are dropped; nothing is
//! returned partially. Running out of time is reported separately from a
//! failed read.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::entities::{PartySummary, Profile, ProfileStats};
use crate::domain::repositories::{ProfileRepository, RepositoryError};
use crate::domain::value_objects::PageInfo;

use super::get_watch_history::{load_watch_page, WatchPage};

/// Most parties listed on a profile page
pub const PARTIES_LIMIT: i64 = 50;

/// Most pending invitations listed on a profile page
pub const INVITED_PARTIES_LIMIT: i64 = 10;

/// Deadline used when the caller does not supply one
pub const DEFAULT_PROFILE_DEADLINE: Duration = Duration::from_secs(3);

/// Everything shown on a member's profile page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePageData {
    pub profile: Profile,
    pub stats: ProfileStats,
    pub parties: Vec<PartySummary>,
    pub invited_parties: Vec<PartySummary>,
    pub watch_history: WatchPage,
}

/// Profile page aggregation use case
pub struct GetProfilePageData<R: ProfileRepository> {
    profile_repo: Arc<R>,
    deadline: Duration,
}

impl<R: ProfileRepository> GetProfilePageData<R> {
    pub fn new(profile_repo: Arc<R>) -> Self {
        Self {
            profile_repo,
            deadline: DEFAULT_PROFILE_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn execute(&self, member_id: i64) -> Result<ProfilePageData, AggregationError> {
        let repo = self.profile_repo.as_ref();

        let fetch_all = async {
            tokio::try_join!(
                async {
                    repo.get_profile_by_id(member_id)
                        .await
                        .map_err(AggregationError::Profile)
                },
                async {
                    repo.get_profile_stats(member_id)
                        .await
                        .map_err(AggregationError::Stats)
                },
                async {
                    tokio::try_join!(
                        repo.get_parties_for_member(member_id, PARTIES_LIMIT),
                        repo.get_invited_parties_for_member(member_id, INVITED_PARTIES_LIMIT),
                    )
                    .map_err(AggregationError::Parties)
                },
                async {
                    load_watch_page(repo, member_id, PageInfo::first())
                        .await
                        .map_err(AggregationError::WatchHistory)
                },
            )
        };

        let result = match tokio::time::timeout(self.deadline, fetch_all).await {
            Ok(result) => result,
            Err(_) => Err(AggregationError::TimedOut(self.deadline)),
        };

        match result {
            Ok((profile, stats, (parties, invited_parties), watch_history)) => {
                Ok(ProfilePageData {
                    profile,
                    stats,
                    parties,
                    invited_parties,
                    watch_history,
                })
            }
            Err(e) => {
                tracing::warn!(member_id, part = e.part(), error = %e, "Profile page aggregation failed");
                Err(e)
            }
        }
    }
}

/// Failure of the profile page, tagged with the read that caused it
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error("Could not load profile: {0}")]
    Profile(#[source] RepositoryError),
    #[error("Could not load profile stats: {0}")]
    Stats(#[source] RepositoryError),
    #[error("Could not load parties: {0}")]
    Parties(#[source] RepositoryError),
    #[error("Could not load watch history: {0}")]
    WatchHistory(#[source] RepositoryError),
    #[error("Profile page not assembled within {0:?}")]
    TimedOut(Duration),
}

impl AggregationError {
    /// Which part of the page failed
    pub fn part(&self) -> &'static str {
        match self {
            AggregationError::Profile(_) => "profile",
            AggregationError::Stats(_) => "stats",
            AggregationError::Parties(_) => "parties",
            AggregationError::WatchHistory(_) => "watch_history",
            AggregationError::TimedOut(_) => "deadline",
        }
    }

    pub fn is_profile_not_found(&self) -> bool {
        matches!(self, AggregationError::Profile(RepositoryError::NotFound(_)))
    }
}
