use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::dto::{api_error, internal_error, timestamp_to_rfc3339, ApiError};
use crate::application::auth::{Login, LoginError, LoginInput, Signup, SignupError, SignupInput};
use crate::domain::entities::Profile;
use crate::infrastructure::app_state::AppState;

/// Create auth router
pub fn create_auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
}

// ========== DTOs ==========

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub profile: ProfileInfo,
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    created_at: String,
}

impl From<Profile> for ProfileInfo {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            created_at: timestamp_to_rfc3339(profile.created_at),
        }
    }
}

fn missing_credentials() -> ApiError {
    api_error(
        StatusCode::BAD_REQUEST,
        "MISSING_CREDENTIALS",
        "Email and password are required",
    )
}

// ========== Handlers ==========

async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = req.email.filter(|s| !s.is_empty()).ok_or_else(missing_credentials)?;
    let password = req.password.filter(|s| !s.is_empty()).ok_or_else(missing_credentials)?;

    let output = Signup::new(state.account_repo.clone(), state.jwt_service.clone())
        .execute(SignupInput {
            email,
            password,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
        })
        .await
        .map_err(|e| match e {
            SignupError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            SignupError::EmailTaken => api_error(
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "Email address already registered",
            ),
            other => internal_error("SIGNUP_ERROR", &other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            profile: output.profile.into(),
            token: output.token,
        }),
    ))
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.filter(|s| !s.is_empty()).ok_or_else(missing_credentials)?;
    let password = req.password.filter(|s| !s.is_empty()).ok_or_else(missing_credentials)?;

    let output = Login::new(state.account_repo.clone(), state.jwt_service.clone())
        .execute(LoginInput { email, password })
        .await
        .map_err(|e| match e {
            LoginError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            LoginError::InvalidCredentials => api_error(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password",
            ),
            other => internal_error("LOGIN_ERROR", &other),
        })?;

    Ok(Json(AuthResponse {
        success: true,
        profile: output.profile.into(),
        token: output.token,
    }))
}
