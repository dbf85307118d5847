use std::sync::Arc;

use crate::domain::entities::{generate_join_code, Party};
use crate::domain::repositories::{PartyRepository, RepositoryError};

/// Join code allocation attempts before giving up
pub const MAX_JOIN_CODE_ATTEMPTS: usize = 5;

const MAX_PARTY_NAME_LENGTH: usize = 100;

/// Create party input
pub struct CreatePartyInput {
    pub owner_id: i64,
    pub name: String,
}

/// Create party use case
pub struct CreateParty<P: PartyRepository> {
    party_repo: Arc<P>,
    code_generator: fn() -> String,
}

impl<P: PartyRepository> CreateParty<P> {
    pub fn new(party_repo: Arc<P>) -> Self {
        Self {
            party_repo,
            code_generator: generate_join_code,
        }
    }

    pub fn with_code_generator(mut self, code_generator: fn() -> String) -> Self {
        self.code_generator = code_generator;
        self
    }

    /// Insert the party with a fresh join code. Only a join code collision is
    /// retried; every other failure is returned as is.
    pub async fn execute(&self, input: CreatePartyInput) -> Result<Party, CreatePartyError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CreatePartyError::Validation("Party name is required".into()));
        }
        if name.chars().count() > MAX_PARTY_NAME_LENGTH {
            return Err(CreatePartyError::Validation(format!(
                "Party name must be at most {} characters",
                MAX_PARTY_NAME_LENGTH
            )));
        }

        for attempt in 1..=MAX_JOIN_CODE_ATTEMPTS {
            let join_code = (self.code_generator)();

            match self
                .party_repo
                .create_party(input.owner_id, name, &join_code)
                .await
            {
                Ok(party) => {
                    tracing::info!(
                        party_id = party.id,
                        owner_id = input.owner_id,
                        "Party created"
                    );
                    return Ok(party);
                }
                Err(RepositoryError::DuplicateJoinCode) => {
                    tracing::warn!(attempt, "Join code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CreatePartyError::JoinCodeExhausted(MAX_JOIN_CODE_ATTEMPTS))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePartyError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Could not allocate a unique join code after {0} attempts")]
    JoinCodeExhausted(usize),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
