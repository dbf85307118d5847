use std::sync::Arc;

use crate::domain::entities::Profile;
use crate::domain::repositories::{AccountRepository, AccountUpdate, RepositoryError};
use crate::infrastructure::auth::{JwtService, PasswordService, MIN_PASSWORD_LENGTH};

/// Profile edit input. An empty `new_password` leaves the password as is.
pub struct UpdateProfileInput {
    pub profile_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// Update profile output; the token carries the new email
#[derive(Debug)]
pub struct UpdateProfileOutput {
    pub profile: Profile,
    pub token: String,
}

/// One rejected field of a profile edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileEditViolation {
    #[error("First name is required")]
    FirstNameRequired,
    #[error("Last name is required")]
    LastNameRequired,
    #[error("A valid email is required")]
    InvalidEmail,
    #[error("Current password is required to set a new one")]
    CurrentPasswordRequired,
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
    #[error("Password confirmation does not match")]
    PasswordMismatch,
}

impl ProfileEditViolation {
    /// Request field the violation belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::FirstNameRequired => "firstName",
            Self::LastNameRequired => "lastName",
            Self::InvalidEmail => "email",
            Self::CurrentPasswordRequired | Self::CurrentPasswordIncorrect => "currentPassword",
            Self::PasswordTooShort => "newPassword",
            Self::PasswordMismatch => "newPasswordConfirmation",
        }
    }
}

/// Edit names, email and optionally the password of a profile
pub struct UpdateProfile {
    account_repo: Arc<dyn AccountRepository>,
    jwt_service: Arc<JwtService>,
}

impl UpdateProfile {
    pub fn new(account_repo: Arc<dyn AccountRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            account_repo,
            jwt_service,
        }
    }

    pub async fn execute(
        &self,
        input: UpdateProfileInput,
    ) -> Result<UpdateProfileOutput, UpdateProfileError> {
        let email = input.email.trim().to_lowercase();
        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();
        let changes_password = !input.new_password.is_empty();

        let mut violations = Vec::new();
        if first_name.is_empty() {
            violations.push(ProfileEditViolation::FirstNameRequired);
        }
        if last_name.is_empty() {
            violations.push(ProfileEditViolation::LastNameRequired);
        }
        if email.is_empty() || !email.contains('@') {
            violations.push(ProfileEditViolation::InvalidEmail);
        }
        if changes_password {
            if input.current_password.is_empty() {
                violations.push(ProfileEditViolation::CurrentPasswordRequired);
            }
            if input.new_password.len() < MIN_PASSWORD_LENGTH {
                violations.push(ProfileEditViolation::PasswordTooShort);
            }
            if input.new_password != input.new_password_confirmation {
                violations.push(ProfileEditViolation::PasswordMismatch);
            }
        }
        if !violations.is_empty() {
            return Err(UpdateProfileError::Validation(violations));
        }

        let (account, _) = self
            .account_repo
            .find_by_profile_id(input.profile_id)
            .await?
            .ok_or(UpdateProfileError::ProfileNotFound)?;

        let password_hash = if changes_password {
            let valid = PasswordService::verify(&input.current_password, &account.password_hash)
                .map_err(|e| UpdateProfileError::Internal(e.to_string()))?;
            if !valid {
                return Err(UpdateProfileError::Validation(vec![
                    ProfileEditViolation::CurrentPasswordIncorrect,
                ]));
            }
            Some(
                PasswordService::hash(&input.new_password)
                    .map_err(|e| UpdateProfileError::Internal(e.to_string()))?,
            )
        } else {
            None
        };

        let profile = self
            .account_repo
            .update_account(&AccountUpdate {
                profile_id: input.profile_id,
                email,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => UpdateProfileError::EmailTaken,
                RepositoryError::NotFound(_) => UpdateProfileError::ProfileNotFound,
                other => other.into(),
            })?;

        let token = self
            .jwt_service
            .sign(profile.id, &profile.email)
            .map_err(|e| UpdateProfileError::Internal(e.to_string()))?;

        tracing::info!(
            profile_id = profile.id,
            password_changed = changes_password,
            "Profile updated"
        );

        Ok(UpdateProfileOutput { profile, token })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProfileError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<ProfileEditViolation>),
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("Email address already registered")]
    EmailTaken,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
