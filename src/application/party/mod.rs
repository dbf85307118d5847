mod add_movie;
mod create_party;
mod get_party_details;
mod invite;
mod join_party;
mod mark_watched;
mod select_movie;

pub use add_movie::*;
pub use create_party::*;
pub use get_party_details::*;
pub use invite::*;
pub use join_party::*;
pub use mark_watched::*;
pub use select_movie::*;
