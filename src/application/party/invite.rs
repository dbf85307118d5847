use std::sync::Arc;

use crate::domain::entities::{Invitation, NewInvitation};
use crate::domain::repositories::{
    AccountRepository, InvitationRepository, PartyRepository, RepositoryError,
};

/// Create invite input
pub struct CreateInviteInput {
    pub party_id: i64,
    pub invited_by: i64,
    pub email: String,
}

/// Invite someone to a party by email. The invitation is linked to the
/// matching profile when the email already has an account.
pub struct CreateInvite<P: PartyRepository, I: InvitationRepository, A: AccountRepository> {
    party_repo: Arc<P>,
    invitation_repo: Arc<I>,
    account_repo: Arc<A>,
}

impl<P: PartyRepository, I: InvitationRepository, A: AccountRepository> CreateInvite<P, I, A> {
    pub fn new(party_repo: Arc<P>, invitation_repo: Arc<I>, account_repo: Arc<A>) -> Self {
        Self {
            party_repo,
            invitation_repo,
            account_repo,
        }
    }

    pub async fn execute(&self, input: CreateInviteInput) -> Result<Invitation, InviteError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(InviteError::Validation("A valid email is required".into()));
        }

        ensure_member(self.party_repo.as_ref(), input.party_id, input.invited_by).await?;

        let profile_id = self
            .account_repo
            .find_by_email(&email)
            .await?
            .map(|(_, profile)| profile.id);

        if let Some(profile_id) = profile_id {
            if self.party_repo.is_member(input.party_id, profile_id).await? {
                return Err(InviteError::AlreadyMember);
            }
        }

        let invitation = self
            .invitation_repo
            .create_invitation(&NewInvitation {
                party_id: input.party_id,
                email,
                profile_id,
                invited_by: input.invited_by,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => InviteError::AlreadyInvited,
                other => other.into(),
            })?;

        tracing::info!(
            party_id = input.party_id,
            invitation_id = invitation.id,
            invited_by = input.invited_by,
            known_account = profile_id.is_some(),
            "Invitation created"
        );

        Ok(invitation)
    }
}

/// List invitations input
pub struct ListInvitationsInput {
    pub party_id: i64,
    pub member_id: i64,
}

/// A party's invitations, newest first; members only
pub struct ListInvitations<P: PartyRepository, I: InvitationRepository> {
    party_repo: Arc<P>,
    invitation_repo: Arc<I>,
}

impl<P: PartyRepository, I: InvitationRepository> ListInvitations<P, I> {
    pub fn new(party_repo: Arc<P>, invitation_repo: Arc<I>) -> Self {
        Self {
            party_repo,
            invitation_repo,
        }
    }

    pub async fn execute(&self, input: ListInvitationsInput) -> Result<Vec<Invitation>, InviteError> {
        ensure_member(self.party_repo.as_ref(), input.party_id, input.member_id).await?;
        Ok(self.invitation_repo.list_for_party(input.party_id).await?)
    }
}

async fn ensure_member<P: PartyRepository>(
    party_repo: &P,
    party_id: i64,
    member_id: i64,
) -> Result<(), InviteError> {
    party_repo
        .find_by_id(party_id)
        .await?
        .ok_or(InviteError::PartyNotFound)?;

    if !party_repo.is_member(party_id, member_id).await? {
        return Err(InviteError::NotAMember);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Party not found")]
    PartyNotFound,
    #[error("Not a member of this party")]
    NotAMember,
    #[error("Already a member of this party")]
    AlreadyMember,
    #[error("Email already invited to this party")]
    AlreadyInvited,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
