mod genre_cache;
mod offline_catalog;
mod tmdb_client;

pub use genre_cache::*;
pub use offline_catalog::*;
pub use tmdb_client::*;
