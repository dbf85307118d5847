use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::api::dto::{api_error, internal_error, timestamp_to_rfc3339, ApiError};
use crate::api::middleware::Claims;
use crate::api::AppState;
use crate::application::party::{
    AddMemberInput, AddMemberToParty, AddMovie, AddMovieError, AddMovieInput, CreateInvite,
    CreateInviteInput, CreateParty, CreatePartyError, CreatePartyInput, GetPartyDetails,
    GetPartyDetailsError, GetPartyDetailsInput, InviteError, JoinByCodeInput, JoinPartyByCode,
    JoinPartyError, ListInvitations, ListInvitationsInput, MarkMovieAsWatched, MarkWatchedError,
    MarkWatchedInput, SelectMovieError, SelectMovieForParty, SelectMovieInput,
};
use crate::domain::entities::{
    Invitation, Movie, MovieRef, Party, PartyMember, PartyMovie, PartyMovieDetails,
};

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePartyRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPartyRequest {
    pub join_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub member_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

/// Either a stored movie id or an external catalog id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub movie_id: Option<i64>,
    pub external_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyResponse {
    pub id: i64,
    pub name: String,
    pub join_code: String,
    pub owner_id: i64,
    pub created_at: String,
}

impl From<Party> for PartyResponse {
    fn from(party: Party) -> Self {
        Self {
            id: party.id,
            name: party.name,
            join_code: party.join_code,
            owner_id: party.owner_id,
            created_at: timestamp_to_rfc3339(party.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PartyEnvelope {
    pub success: bool,
    pub party: PartyResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub member_id: i64,
    pub name: String,
    pub owner: bool,
    pub joined_at: String,
}

impl From<PartyMember> for MemberInfo {
    fn from(member: PartyMember) -> Self {
        Self {
            name: member.full_name(),
            member_id: member.member_id,
            owner: member.owner,
            joined_at: timestamp_to_rfc3339(member.joined_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInfo {
    pub id: i64,
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

impl From<Movie> for MovieInfo {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            external_id: movie.external_id,
            title: movie.title,
            release_date: movie.release_date,
            overview: movie.overview,
            tagline: movie.tagline,
            poster_url: movie.poster_url,
            trailer_url: movie.trailer_url,
            runtime: movie.runtime,
            rating: movie.rating,
            genres: movie.genres,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMovieInfo {
    pub movie: MovieInfo,
    pub added_by: i64,
    pub added_by_name: String,
    pub watch_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_date: Option<String>,
    pub added_on: String,
}

impl From<PartyMovieDetails> for PartyMovieInfo {
    fn from(details: PartyMovieDetails) -> Self {
        Self {
            movie: details.movie.into(),
            added_by: details.added_by,
            added_by_name: details.added_by_name,
            watch_status: details.watch_status.as_str().to_string(),
            watch_date: details.watch_date.map(timestamp_to_rfc3339),
            added_on: timestamp_to_rfc3339(details.added_on),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMovieStatus {
    pub party_id: i64,
    pub movie_id: i64,
    pub added_by: i64,
    pub watch_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_date: Option<String>,
}

impl From<PartyMovie> for PartyMovieStatus {
    fn from(movie: PartyMovie) -> Self {
        Self {
            party_id: movie.party_id,
            movie_id: movie.movie_id,
            added_by: movie.added_by,
            watch_status: movie.watch_status.as_str().to_string(),
            watch_date: movie.watch_date.map(timestamp_to_rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMoviesResponse {
    pub unwatched: Vec<PartyMovieInfo>,
    pub selected: Option<PartyMovieInfo>,
    pub watched: Vec<PartyMovieInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDetailsResponse {
    pub success: bool,
    pub party: PartyResponse,
    pub members: Vec<MemberInfo>,
    pub movies: PartyMoviesResponse,
    pub is_owner: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieResponse {
    pub success: bool,
    pub movie: MovieInfo,
    pub party_movie: PartyMovieStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationInfo {
    pub id: i64,
    pub party_id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i64>,
    pub invited_by: i64,
    pub created_at: String,
}

impl From<Invitation> for InvitationInfo {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            party_id: invitation.party_id,
            email: invitation.email,
            profile_id: invitation.profile_id,
            invited_by: invitation.invited_by,
            created_at: timestamp_to_rfc3339(invitation.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub success: bool,
    pub invitation: InvitationInfo,
}

#[derive(Debug, Serialize)]
pub struct InvitationsResponse {
    pub success: bool,
    pub invitations: Vec<InvitationInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMovieResponse {
    pub success: bool,
    pub party_movie: PartyMovieStatus,
}

// ============================================================================
// Error mapping
// ============================================================================

fn party_not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "PARTY_NOT_FOUND", "Party not found")
}

fn not_a_member() -> ApiError {
    api_error(StatusCode::FORBIDDEN, "NOT_A_MEMBER", "Not a member of this party")
}

fn join_error(e: JoinPartyError) -> ApiError {
    match e {
        JoinPartyError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        JoinPartyError::PartyNotFound => party_not_found(),
        JoinPartyError::NotOwner => api_error(
            StatusCode::FORBIDDEN,
            "NOT_OWNER",
            "Only the party owner can add members",
        ),
        JoinPartyError::AlreadyMember => api_error(
            StatusCode::CONFLICT,
            "ALREADY_MEMBER",
            "Already a member of this party",
        ),
        JoinPartyError::Repository(e) => internal_error("JOIN_PARTY_ERROR", &e),
    }
}

fn invite_error(e: InviteError) -> ApiError {
    match e {
        InviteError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        InviteError::PartyNotFound => party_not_found(),
        InviteError::NotAMember => not_a_member(),
        InviteError::AlreadyMember => api_error(
            StatusCode::CONFLICT,
            "ALREADY_MEMBER",
            "Already a member of this party",
        ),
        InviteError::AlreadyInvited => api_error(
            StatusCode::CONFLICT,
            "ALREADY_INVITED",
            "Email already invited to this party",
        ),
        InviteError::Repository(e) => internal_error("INVITATION_ERROR", &e),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/parties - Create a new party owned by the caller
pub async fn create_party(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreatePartyRequest>,
) -> Result<(StatusCode, Json<PartyEnvelope>), ApiError> {
    let party = CreateParty::new(state.party_repo.clone())
        .execute(CreatePartyInput {
            owner_id: claims.profile_id,
            name: body.name,
        })
        .await
        .map_err(|e| match e {
            CreatePartyError::Validation(msg) => {
                api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            CreatePartyError::JoinCodeExhausted(_) => api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "JOIN_CODE_EXHAUSTED",
                "Could not allocate a join code, please try again",
            ),
            CreatePartyError::Repository(e) => internal_error("CREATE_PARTY_ERROR", &e),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(PartyEnvelope {
            success: true,
            party: party.into(),
        }),
    ))
}

/// POST /api/parties/join - Join a party by its join code
pub async fn join_party(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<JoinPartyRequest>,
) -> Result<Json<PartyEnvelope>, ApiError> {
    let party = JoinPartyByCode::new(state.party_repo.clone())
        .execute(JoinByCodeInput {
            join_code: body.join_code,
            member_id: claims.profile_id,
        })
        .await
        .map_err(join_error)?;

    Ok(Json(PartyEnvelope {
        success: true,
        party: party.into(),
    }))
}

/// POST /api/parties/:partyId/members - Owner adds a member by id
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(party_id): Path<i64>,
    Json(body): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<PartyEnvelope>), ApiError> {
    let party = AddMemberToParty::new(state.party_repo.clone())
        .execute(AddMemberInput {
            party_id,
            member_id: body.member_id,
            requested_by: claims.profile_id,
        })
        .await
        .map_err(join_error)?;

    Ok((
        StatusCode::CREATED,
        Json(PartyEnvelope {
            success: true,
            party: party.into(),
        }),
    ))
}

/// POST /api/parties/:partyId/invitations - Invite someone by email
pub async fn create_invitation(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(party_id): Path<i64>,
    Json(body): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), ApiError> {
    let invitation = CreateInvite::new(
        state.party_repo.clone(),
        state.invitation_repo.clone(),
        state.account_repo.clone(),
    )
    .execute(CreateInviteInput {
        party_id,
        invited_by: claims.profile_id,
        email: body.email,
    })
    .await
    .map_err(invite_error)?;

    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse {
            success: true,
            invitation: invitation.into(),
        }),
    ))
}

/// GET /api/parties/:partyId/invitations - Invitations, newest first
pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(party_id): Path<i64>,
) -> Result<Json<InvitationsResponse>, ApiError> {
    let invitations = ListInvitations::new(state.party_repo.clone(), state.invitation_repo.clone())
        .execute(ListInvitationsInput {
            party_id,
            member_id: claims.profile_id,
        })
        .await
        .map_err(invite_error)?;

    Ok(Json(InvitationsResponse {
        success: true,
        invitations: invitations.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/parties/:partyId - Party, members and movies by status
pub async fn get_party_details(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(party_id): Path<i64>,
) -> Result<Json<PartyDetailsResponse>, ApiError> {
    let result = GetPartyDetails::new(state.party_repo.clone())
        .execute(GetPartyDetailsInput {
            party_id,
            member_id: claims.profile_id,
        })
        .await
        .map_err(|e| match e {
            GetPartyDetailsError::PartyNotFound => party_not_found(),
            GetPartyDetailsError::NotAMember => not_a_member(),
            GetPartyDetailsError::Repository(e) => internal_error("GET_PARTY_ERROR", &e),
        })?;

    Ok(Json(PartyDetailsResponse {
        success: true,
        party: result.party.into(),
        members: result.members.into_iter().map(Into::into).collect(),
        movies: PartyMoviesResponse {
            unwatched: result.movies.unwatched.into_iter().map(Into::into).collect(),
            selected: result.movies.selected.map(Into::into),
            watched: result.movies.watched.into_iter().map(Into::into).collect(),
        },
        is_owner: result.is_owner,
    }))
}

/// POST /api/parties/:partyId/movies - Add a movie to the party
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(party_id): Path<i64>,
    Json(body): Json<AddMovieRequest>,
) -> Result<(StatusCode, Json<AddMovieResponse>), ApiError> {
    let movie = match (body.movie_id, body.external_id) {
        (Some(id), None) => MovieRef::Internal(id),
        (None, Some(external_id)) => MovieRef::External(external_id),
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Provide exactly one of movieId or externalId",
            ))
        }
    };

    let result = AddMovie::new(
        state.party_repo.clone(),
        state.movie_repo.clone(),
        state.metadata.clone(),
    )
    .execute(AddMovieInput {
        party_id,
        member_id: claims.profile_id,
        movie,
    })
    .await
    .map_err(|e| match e {
        AddMovieError::PartyNotFound => party_not_found(),
        AddMovieError::NotAMember => not_a_member(),
        AddMovieError::MovieNotFound => {
            api_error(StatusCode::NOT_FOUND, "MOVIE_NOT_FOUND", "Movie not found")
        }
        AddMovieError::MovieAlreadyAdded => api_error(
            StatusCode::CONFLICT,
            "MOVIE_ALREADY_ADDED",
            "Movie is already on this party",
        ),
        AddMovieError::Catalog(e) => {
            tracing::warn!("Movie catalog lookup failed: {}", e);
            api_error(
                StatusCode::BAD_GATEWAY,
                "CATALOG_UNAVAILABLE",
                "Movie catalog is unavailable",
            )
        }
        AddMovieError::Repository(e) => internal_error("ADD_MOVIE_ERROR", &e),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(AddMovieResponse {
            success: true,
            movie: result.movie.into(),
            party_movie: result.party_movie.into(),
        }),
    ))
}

/// POST /api/parties/:partyId/select - Pick the next movie to watch
pub async fn select_movie(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(party_id): Path<i64>,
) -> Result<Json<PartyMovieResponse>, ApiError> {
    let selected = SelectMovieForParty::new(state.party_repo.clone())
        .execute(SelectMovieInput {
            party_id,
            member_id: claims.profile_id,
        })
        .await
        .map_err(|e| match e {
            SelectMovieError::PartyNotFound => party_not_found(),
            SelectMovieError::NotAMember => not_a_member(),
            SelectMovieError::AlreadySelected(current) => {
                let mut err = api_error(
                    StatusCode::CONFLICT,
                    "ALREADY_SELECTED",
                    "A movie is already selected for this party",
                );
                err.1.details = Some(format!("movieId={}", current.movie_id));
                err
            }
            SelectMovieError::NoCandidates => api_error(
                StatusCode::CONFLICT,
                "NO_CANDIDATES",
                "No unwatched movies to pick from",
            ),
            SelectMovieError::Repository(e) => internal_error("SELECT_MOVIE_ERROR", &e),
        })?;

    Ok(Json(PartyMovieResponse {
        success: true,
        party_movie: selected.into(),
    }))
}

/// POST /api/parties/:partyId/movies/:movieId/watched - Mark a movie watched
pub async fn mark_watched(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((party_id, movie_id)): Path<(i64, i64)>,
) -> Result<Json<PartyMovieResponse>, ApiError> {
    let watched = MarkMovieAsWatched::new(state.party_repo.clone())
        .execute(MarkWatchedInput {
            party_id,
            member_id: claims.profile_id,
            movie_id,
        })
        .await
        .map_err(|e| match e {
            MarkWatchedError::PartyNotFound => party_not_found(),
            MarkWatchedError::NotAMember => not_a_member(),
            MarkWatchedError::MovieNotOnParty => api_error(
                StatusCode::NOT_FOUND,
                "MOVIE_NOT_ON_PARTY",
                "Movie is not on this party",
            ),
            MarkWatchedError::InvalidTransition(from) => api_error(
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
                format!("Movie is already {}", from),
            ),
            MarkWatchedError::Repository(e) => internal_error("MARK_WATCHED_ERROR", &e),
        })?;

    Ok(Json(PartyMovieResponse {
        success: true,
        party_movie: watched.into(),
    }))
}
