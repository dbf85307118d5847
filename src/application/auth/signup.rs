use std::sync::Arc;

use crate::domain::entities::Profile;
use crate::domain::repositories::{AccountRepository, RepositoryError};
use crate::infrastructure::auth::{JwtService, PasswordService, MIN_PASSWORD_LENGTH};

/// Signup input
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Signup output
#[derive(Debug)]
pub struct SignupOutput {
    pub profile: Profile,
    pub token: String,
}

/// Create an account with its profile and sign the caller in
pub struct Signup {
    account_repo: Arc<dyn AccountRepository>,
    jwt_service: Arc<JwtService>,
}

impl Signup {
    pub fn new(account_repo: Arc<dyn AccountRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            account_repo,
            jwt_service,
        }
    }

    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, SignupError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(SignupError::Validation("A valid email is required".into()));
        }
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(SignupError::Validation("First and last name are required".into()));
        }
        if input.password.len() < MIN_PASSWORD_LENGTH {
            return Err(SignupError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = PasswordService::hash(&input.password)
            .map_err(|e| SignupError::Internal(e.to_string()))?;

        let profile = self
            .account_repo
            .create_account_with_profile(
                &email,
                &password_hash,
                input.first_name.trim(),
                input.last_name.trim(),
            )
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => SignupError::EmailTaken,
                other => other.into(),
            })?;

        let token = self
            .jwt_service
            .sign(profile.id, &profile.email)
            .map_err(|e| SignupError::Internal(e.to_string()))?;

        tracing::info!(profile_id = profile.id, "Account created");

        Ok(SignupOutput { profile, token })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Email address already registered")]
    EmailTaken,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
