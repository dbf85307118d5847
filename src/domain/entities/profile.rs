use serde::{Deserialize, Serialize};

/// Account entity - login credentials behind a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}

/// Profile entity - a member's identity-facing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub account_id: i64,
    pub email: String,
    pub created_at: i64,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Stats derived at read time, never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub party_count: i64,
    /// Sum of runtimes of watched movies, in minutes
    pub watch_time_minutes: i64,
    pub movies_watched: i64,
}

/// One entry of a member's watch history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedMovie {
    pub movie_id: i64,
    pub title: String,
    pub watch_date: Option<i64>,
    pub party_name: String,
}
