pub mod repositories;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::domain::repositories::RepositoryError;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite pool. An in-memory database is pinned to a single
/// connection that never idles out, otherwise every connection would see
/// its own empty database. File databases run in WAL mode so readers do not
/// block the writer.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        if let Some(dir) = options.get_filename().parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options.journal_mode(SqliteJournalMode::Wal))
            .await?
    };

    Ok(pool)
}

/// Apply the embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Columns named by a unique violation, e.g. `parties.join_code`
pub(crate) fn unique_violation_columns(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let message = db_err.message();
            let columns = message
                .split_once("failed: ")
                .map(|(_, cols)| cols)
                .unwrap_or(message);
            Some(columns.trim().to_string())
        }
        _ => None,
    }
}

pub(crate) fn is_unique_violation_on(err: &sqlx::Error, columns: &str) -> bool {
    unique_violation_columns(err).as_deref() == Some(columns)
}

pub(crate) fn db_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}
