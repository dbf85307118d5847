mod account_repository;
mod invitation_repository;
mod movie_repository;
mod party_repository;
mod profile_repository;

pub use account_repository::*;
pub use invitation_repository::*;
pub use movie_repository::*;
pub use party_repository::*;
pub use profile_repository::*;

use crate::domain::entities::WatchStatus;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Join code already in use")]
    DuplicateJoinCode,
    #[error("Member already belongs to party")]
    DuplicateMembership,
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: WatchStatus, to: WatchStatus },
    #[error("Party already has a selected movie")]
    SelectionOccupied,
    #[error("Database error: {0}")]
    Database(String),
}
