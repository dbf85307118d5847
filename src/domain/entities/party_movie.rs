use serde::{Deserialize, Serialize};

/// Watch lifecycle of a movie within a party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    Unwatched,
    Selected,
    Watched,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 3] = [
        WatchStatus::Unwatched,
        WatchStatus::Selected,
        WatchStatus::Watched,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Unwatched => "unwatched",
            WatchStatus::Selected => "selected",
            WatchStatus::Watched => "watched",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unwatched" => Some(WatchStatus::Unwatched),
            "selected" => Some(WatchStatus::Selected),
            "watched" => Some(WatchStatus::Watched),
            _ => None,
        }
    }

    /// Transitions only move forward. `unwatched -> watched` skips the
    /// selected slot and is allowed.
    pub fn can_transition_to(&self, next: WatchStatus) -> bool {
        matches!(
            (self, next),
            (WatchStatus::Unwatched, WatchStatus::Selected)
                | (WatchStatus::Unwatched, WatchStatus::Watched)
                | (WatchStatus::Selected, WatchStatus::Watched)
        )
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PartyMovie entity - one candidate movie on one party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMovie {
    pub party_id: i64,
    pub movie_id: i64,
    pub added_by: i64,
    pub watch_status: WatchStatus,
    pub watch_date: Option<i64>,
    pub created_at: i64,
}

impl PartyMovie {
    /// Apply a status transition. Moving to `watched` stamps `now` as the
    /// watch date; the selected slot never carries one.
    pub fn transition(&mut self, next: WatchStatus, now: i64) -> Result<(), TransitionError> {
        if !self.watch_status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.watch_status,
                to: next,
            });
        }

        self.watch_status = next;
        self.watch_date = match next {
            WatchStatus::Watched => Some(now),
            _ => None,
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move a movie from {from} to {to}")]
pub struct TransitionError {
    pub from: WatchStatus,
    pub to: WatchStatus,
}

/// A party movie joined with its metadata and contributor name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMovieDetails {
    pub movie: crate::domain::entities::Movie,
    pub added_by: i64,
    pub added_by_name: String,
    pub watch_status: WatchStatus,
    pub watch_date: Option<i64>,
    pub added_on: i64,
}

/// Party movies grouped by lifecycle stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviesByStatus {
    pub unwatched: Vec<PartyMovieDetails>,
    pub selected: Option<PartyMovieDetails>,
    pub watched: Vec<PartyMovieDetails>,
}

impl MoviesByStatus {
    /// Group movies by status. Watched movies are ordered newest first, the
    /// others keep their input order.
    pub fn group(movies: Vec<PartyMovieDetails>) -> Self {
        let mut grouped = Self::default();
        for movie in movies {
            match movie.watch_status {
                WatchStatus::Unwatched => grouped.unwatched.push(movie),
                WatchStatus::Selected => grouped.selected = Some(movie),
                WatchStatus::Watched => grouped.watched.push(movie),
            }
        }
        grouped
            .watched
            .sort_by(|a, b| b.watch_date.cmp(&a.watch_date));
        grouped
    }
}
