use async_trait::async_trait;

use crate::domain::entities::{Invitation, NewInvitation};
use crate::domain::repositories::RepositoryError;

/// Party invitations by email
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Store an invitation. Inviting the same email to a party twice
    /// yields `RepositoryError::AlreadyExists`.
    async fn create_invitation(&self, invite: &NewInvitation) -> Result<Invitation, RepositoryError>;

    /// Invitations of a party, newest first
    async fn list_for_party(&self, party_id: i64) -> Result<Vec<Invitation>, RepositoryError>;
}
