use std::sync::Arc;

use crate::domain::entities::Profile;
use crate::domain::repositories::{AccountRepository, RepositoryError};
use crate::infrastructure::auth::{JwtService, PasswordService};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub profile: Profile,
    pub token: String,
}

/// Login use case
pub struct Login {
    account_repo: Arc<dyn AccountRepository>,
    jwt_service: Arc<JwtService>,
}

impl Login {
    pub fn new(account_repo: Arc<dyn AccountRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            account_repo,
            jwt_service,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, LoginError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(LoginError::Validation("Email is required".into()));
        }
        if input.password.is_empty() {
            return Err(LoginError::Validation("Password is required".into()));
        }

        let (account, profile) = self
            .account_repo
            .find_by_email(&email)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        let valid = PasswordService::verify(&input.password, &account.password_hash)
            .map_err(|e| LoginError::Internal(e.to_string()))?;
        if !valid {
            return Err(LoginError::InvalidCredentials);
        }

        let token = self
            .jwt_service
            .sign(profile.id, &profile.email)
            .map_err(|e| LoginError::Internal(e.to_string()))?;

        Ok(LoginOutput { profile, token })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
