use std::sync::Arc;

use crate::domain::entities::Party;
use crate::domain::repositories::{PartyRepository, RepositoryError};

/// Add member input
pub struct AddMemberInput {
    pub party_id: i64,
    pub member_id: i64,
    /// Member asking for the addition; must own the party
    pub requested_by: i64,
}

/// Owner adds a member to their party by id
pub struct AddMemberToParty<P: PartyRepository> {
    party_repo: Arc<P>,
}

impl<P: PartyRepository> AddMemberToParty<P> {
    pub fn new(party_repo: Arc<P>) -> Self {
        Self { party_repo }
    }

    pub async fn execute(&self, input: AddMemberInput) -> Result<Party, JoinPartyError> {
        let party = self
            .party_repo
            .find_by_id(input.party_id)
            .await?
            .ok_or(JoinPartyError::PartyNotFound)?;

        if !party.is_owned_by(input.requested_by) {
            return Err(JoinPartyError::NotOwner);
        }

        add_membership(self.party_repo.as_ref(), &party, input.member_id).await?;
        Ok(party)
    }
}

/// Join by code input
pub struct JoinByCodeInput {
    pub join_code: String,
    pub member_id: i64,
}

/// Join a party through its shareable join code
pub struct JoinPartyByCode<P: PartyRepository> {
    party_repo: Arc<P>,
}

impl<P: PartyRepository> JoinPartyByCode<P> {
    pub fn new(party_repo: Arc<P>) -> Self {
        Self { party_repo }
    }

    pub async fn execute(&self, input: JoinByCodeInput) -> Result<Party, JoinPartyError> {
        let code = input.join_code.trim();
        if code.is_empty() {
            return Err(JoinPartyError::Validation("Join code is required".into()));
        }

        let party = self
            .party_repo
            .find_by_join_code(code)
            .await?
            .ok_or(JoinPartyError::PartyNotFound)?;

        add_membership(self.party_repo.as_ref(), &party, input.member_id).await?;
        Ok(party)
    }
}

async fn add_membership<P: PartyRepository + ?Sized>(
    party_repo: &P,
    party: &Party,
    member_id: i64,
) -> Result<(), JoinPartyError> {
    match party_repo.create_membership(member_id, party.id).await {
        Ok(()) => {
            tracing::info!(party_id = party.id, member_id, "Member joined party");
            Ok(())
        }
        Err(RepositoryError::DuplicateMembership) => Err(JoinPartyError::AlreadyMember),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinPartyError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Party not found")]
    PartyNotFound,
    #[error("Only the party owner can add members")]
    NotOwner,
    #[error("Already a member of this party")]
    AlreadyMember,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryPartyRepository;

    #[tokio::test]
    async fn test_add_member_by_id() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");

        let joined = AddMemberToParty::new(repo.clone())
            .execute(AddMemberInput {
                party_id: party.id,
                member_id: 2,
                requested_by: 1,
            })
            .await
            .unwrap();

        assert_eq!(joined.id, party.id);
        assert!(repo.is_member(party.id, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_second_join_is_already_member() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");
        let use_case = AddMemberToParty::new(repo.clone());

        use_case
            .execute(AddMemberInput {
                party_id: party.id,
                member_id: 2,
                requested_by: 1,
            })
            .await
            .unwrap();
        let err = use_case
            .execute(AddMemberInput {
                party_id: party.id,
                member_id: 2,
                requested_by: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, JoinPartyError::AlreadyMember));
        assert_eq!(repo.get_party_members(party.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_only_owner_adds_members() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");

        let err = AddMemberToParty::new(repo.clone())
            .execute(AddMemberInput {
                party_id: party.id,
                member_id: 3,
                requested_by: 2,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, JoinPartyError::NotOwner));
        assert!(!repo.is_member(party.id, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_joining_own_party_is_already_member() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");

        let err = JoinPartyByCode::new(repo)
            .execute(JoinByCodeInput {
                join_code: party.join_code.clone(),
                member_id: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, JoinPartyError::AlreadyMember));
    }

    #[tokio::test]
    async fn test_join_by_code() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let party = repo.seed_party(1, "Movie Night");

        let joined = JoinPartyByCode::new(repo.clone())
            .execute(JoinByCodeInput {
                join_code: format!(" {} ", party.join_code),
                member_id: 3,
            })
            .await
            .unwrap();

        assert_eq!(joined.id, party.id);
        assert!(repo.is_member(party.id, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_code_is_party_not_found() {
        let repo = Arc::new(InMemoryPartyRepository::new());
        let err = JoinPartyByCode::new(repo)
            .execute(JoinByCodeInput {
                join_code: "nope42".to_string(),
                member_id: 3,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, JoinPartyError::PartyNotFound));
    }
}
