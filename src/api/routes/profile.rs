use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::api::dto::{api_error, internal_error, timestamp_to_rfc3339, ApiError, FieldIssue};
use crate::api::middleware::Claims;
use crate::api::routes::auth::AuthResponse;
use crate::api::AppState;
use crate::application::profile::{
    AggregationError, GetProfilePageData, GetWatchPaginatedHistory, UpdateProfile,
    UpdateProfileError, UpdateProfileInput, WatchPage,
};
use crate::domain::entities::{PartySummary, ProfileStats, WatchedMovie};
use crate::domain::value_objects::{PageInfo, DEFAULT_PAGE_SIZE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Profile edit form; absent password fields mean no password change
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileDetails,
    pub stats: ProfileStats,
    pub parties: Vec<PartyListItem>,
    pub invited_parties: Vec<PartyListItem>,
    pub watch_history: WatchHistoryResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyListItem {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub member_count: i64,
    pub movie_count: i64,
    pub created_at: String,
}

impl From<PartySummary> for PartyListItem {
    fn from(party: PartySummary) -> Self {
        Self {
            id: party.id,
            name: party.name,
            owner_id: party.owner_id,
            member_count: party.member_count,
            movie_count: party.movie_count,
            created_at: timestamp_to_rfc3339(party.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedMovieItem {
    pub movie_id: i64,
    pub title: String,
    pub party_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_date: Option<String>,
}

impl From<WatchedMovie> for WatchedMovieItem {
    fn from(movie: WatchedMovie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title,
            party_name: movie.party_name,
            watch_date: movie.watch_date.map(timestamp_to_rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryResponse {
    pub movies: Vec<WatchedMovieItem>,
    pub current_page: i64,
    pub total_pages: i64,
}

impl From<WatchPage> for WatchHistoryResponse {
    fn from(page: WatchPage) -> Self {
        Self {
            movies: page.movies.into_iter().map(Into::into).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
        }
    }
}

/// GET /api/profile - The caller's profile page
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let data = GetProfilePageData::new(state.profile_repo.clone())
        .with_deadline(state.config.profile_fetch_timeout)
        .execute(claims.profile_id)
        .await
        .map_err(|e| {
            if e.is_profile_not_found() {
                return api_error(StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND", "Profile not found");
            }
            match e {
                AggregationError::TimedOut(_) => api_error(
                    StatusCode::GATEWAY_TIMEOUT,
                    "PROFILE_TIMEOUT",
                    "Profile took too long to load",
                ),
                other => {
                    let mut err = internal_error("PROFILE_LOAD_ERROR", &other);
                    err.1.details = Some(other.part().to_string());
                    err
                }
            }
        })?;

    Ok(Json(ProfileResponse {
        success: true,
        profile: ProfileDetails {
            id: data.profile.id,
            first_name: data.profile.first_name,
            last_name: data.profile.last_name,
            email: data.profile.email,
            created_at: timestamp_to_rfc3339(data.profile.created_at),
        },
        stats: data.stats,
        parties: data.parties.into_iter().map(Into::into).collect(),
        invited_parties: data.invited_parties.into_iter().map(Into::into).collect(),
        watch_history: data.watch_history.into(),
    }))
}

/// GET /api/profile/history?page=&pageSize= - One page of watch history
pub async fn get_watch_history(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<WatchHistoryResponse>, ApiError> {
    let page = PageInfo::new(
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    );

    let history = GetWatchPaginatedHistory::new(state.profile_repo.clone())
        .execute(claims.profile_id, page)
        .await
        .map_err(|e| internal_error("WATCH_HISTORY_ERROR", &e))?;

    Ok(Json(history.into()))
}

/// PUT /api/profile - Edit names, email and optionally the password
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let result = UpdateProfile::new(state.account_repo.clone(), state.jwt_service.clone())
        .execute(UpdateProfileInput {
            profile_id: claims.profile_id,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            current_password: body.current_password,
            new_password: body.new_password,
            new_password_confirmation: body.new_password_confirmation,
        })
        .await
        .map_err(|e| match e {
            UpdateProfileError::Validation(violations) => {
                let mut err = api_error(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Some fields are invalid",
                );
                err.1.fields = violations
                    .iter()
                    .map(|v| FieldIssue {
                        field: v.field().to_string(),
                        message: v.to_string(),
                    })
                    .collect();
                err
            }
            UpdateProfileError::ProfileNotFound => {
                api_error(StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND", "Profile not found")
            }
            UpdateProfileError::EmailTaken => api_error(
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "Email address already registered",
            ),
            other => internal_error("UPDATE_PROFILE_ERROR", &other),
        })?;

    Ok(Json(AuthResponse {
        success: true,
        profile: result.profile.into(),
        token: result.token,
    }))
}
