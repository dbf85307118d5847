mod account_repo;
mod invitation_repo;
mod movie_repo;
mod party_repo;
mod profile_repo;

pub use account_repo::SqliteAccountRepository;
pub use invitation_repo::SqliteInvitationRepository;
pub use movie_repo::SqliteMovieRepository;
pub use party_repo::SqlitePartyRepository;
pub use profile_repo::SqliteProfileRepository;
