use async_trait::async_trait;

use crate::domain::entities::{Account, Profile};
use crate::domain::repositories::RepositoryError;

/// New identity details for an existing profile
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub profile_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Left unchanged when `None`
    pub password_hash: Option<String>,
}

/// Account repository trait
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create an account and its profile in one transaction.
    /// A taken email yields `RepositoryError::AlreadyExists`.
    async fn create_account_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, RepositoryError>;

    /// Find account and its profile by email
    async fn find_by_email(&self, email: &str)
        -> Result<Option<(Account, Profile)>, RepositoryError>;

    /// Find account and its profile by profile id
    async fn find_by_profile_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<(Account, Profile)>, RepositoryError>;

    /// Update the profile and its account in one transaction. A missing
    /// profile yields `NotFound`, an email held by another account
    /// `AlreadyExists`.
    async fn update_account(&self, update: &AccountUpdate) -> Result<Profile, RepositoryError>;
}
