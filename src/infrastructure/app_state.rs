use std::sync::Arc;

use sqlx::SqlitePool;

use crate::domain::repositories::MovieMetadataSource;
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::repositories::{
    SqliteAccountRepository, SqliteInvitationRepository, SqliteMovieRepository,
    SqlitePartyRepository, SqliteProfileRepository,
};
use crate::infrastructure::database::{connect, run_migrations};
use crate::infrastructure::services::{OfflineMetadataSource, TmdbClient, TmdbConfig};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    /// Database connection pool
    pub db: SqlitePool,

    /// JWT service for token management
    pub jwt_service: Arc<JwtService>,

    pub account_repo: Arc<SqliteAccountRepository>,
    pub party_repo: Arc<SqlitePartyRepository>,
    pub movie_repo: Arc<SqliteMovieRepository>,
    pub profile_repo: Arc<SqliteProfileRepository>,
    pub invitation_repo: Arc<SqliteInvitationRepository>,

    /// External movie metadata (TMDB, or offline when no key is set)
    pub metadata: Arc<dyn MovieMetadataSource>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        let db = connect(&config.database_url, config.db_max_connections).await?;
        run_migrations(&db).await?;

        let metadata: Arc<dyn MovieMetadataSource> = match &config.tmdb_api_key {
            Some(api_key) => {
                let client = TmdbClient::connect(TmdbConfig {
                    base_url: config.tmdb_base_url.clone(),
                    api_key: api_key.clone(),
                    timeout_secs: 10,
                })
                .await?;
                Arc::new(client)
            }
            None => {
                tracing::warn!("TMDB_API_KEY not set - movie catalog is offline");
                Arc::new(OfflineMetadataSource)
            }
        };

        Ok(Self::from_parts(config, db, metadata))
    }

    /// Assemble state around an existing pool and metadata source
    pub fn from_parts(
        config: AppConfig,
        db: SqlitePool,
        metadata: Arc<dyn MovieMetadataSource>,
    ) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt_secret)),
            account_repo: Arc::new(SqliteAccountRepository::new(db.clone())),
            party_repo: Arc::new(SqlitePartyRepository::new(db.clone())),
            movie_repo: Arc::new(SqliteMovieRepository::new(db.clone())),
            profile_repo: Arc::new(SqliteProfileRepository::new(db.clone())),
            invitation_repo: Arc::new(SqliteInvitationRepository::new(db.clone())),
            config: Arc::new(config),
            db,
            metadata,
        }
    }
}
