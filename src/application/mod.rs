pub mod auth;
pub mod movies;
pub mod party;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_support;
