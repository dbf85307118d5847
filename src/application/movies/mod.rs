mod get_or_create_movie;
mod search_movies;

pub use get_or_create_movie::*;
pub use search_movies::*;
