mod invitation;
mod member;
mod movie;
mod party;
mod party_movie;
mod profile;

pub use invitation::*;
pub use member::*;
pub use movie::*;
pub use party::*;
pub use party_movie::*;
pub use profile::*;
