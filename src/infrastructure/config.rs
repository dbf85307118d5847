use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/movieswithfriends.db";
const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Runtime configuration read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub jwt_secret: String,
    /// Catalog API key; the catalog runs offline without one
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    /// Deadline for assembling a profile page
    pub profile_fetch_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: 5,
            port: 4000,
            jwt_secret: "movieswithfriends-secret-change-in-production".to_string(),
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            profile_fetch_timeout: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_PATH"))
            .map(|path| {
                // Ensure path has sqlite: prefix
                if path.starts_with("sqlite:") {
                    path
                } else {
                    format!("sqlite:{}", path)
                }
            })
            .unwrap_or(defaults.database_url);

        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            database_url,
            db_max_connections: parsed("DB_MAX_CONNECTIONS")
                .map(|n| n as u32)
                .unwrap_or(defaults.db_max_connections),
            port: parsed("PORT").map(|p| p as u16).unwrap_or(defaults.port),
            jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            tmdb_api_key: lookup("TMDB_API_KEY").filter(|k| !k.trim().is_empty()),
            tmdb_base_url: lookup("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            profile_fetch_timeout: parsed("PROFILE_FETCH_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.profile_fetch_timeout),
            request_timeout: parsed("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}
