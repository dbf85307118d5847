use std::sync::Arc;

use crate::domain::entities::{MoviesByStatus, Party, PartyMember};
use crate::domain::repositories::{PartyRepository, RepositoryError};

/// Get party details input
pub struct GetPartyDetailsInput {
    pub party_id: i64,
    pub member_id: i64,
}

/// Get party details output
#[derive(Debug)]
pub struct GetPartyDetailsOutput {
    pub party: Party,
    pub members: Vec<PartyMember>,
    pub movies: MoviesByStatus,
    pub is_owner: bool,
}

/// Get party details use case
pub struct GetPartyDetails<P: PartyRepository> {
    party_repo: Arc<P>,
}

impl<P: PartyRepository> GetPartyDetails<P> {
    pub fn new(party_repo: Arc<P>) -> Self {
        Self { party_repo }
    }

    pub async fn execute(
        &self,
        input: GetPartyDetailsInput,
    ) -> Result<GetPartyDetailsOutput, GetPartyDetailsError> {
        let party = self
            .party_repo
            .find_by_id(input.party_id)
            .await?
            .ok_or(GetPartyDetailsError::PartyNotFound)?;

        let members = self.party_repo.get_party_members(input.party_id).await?;
        let me = members
            .iter()
            .find(|m| m.member_id == input.member_id)
            .ok_or(GetPartyDetailsError::NotAMember)?;
        let is_owner = me.owner;

        let movies = self.party_repo.get_party_movies(input.party_id).await?;

        Ok(GetPartyDetailsOutput {
            party,
            members,
            movies: MoviesByStatus::group(movies),
            is_owner,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetPartyDetailsError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Not a member of this party")]
    NotAMember,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
