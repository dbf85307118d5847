use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Movie, NewMovie};
use crate::domain::repositories::{MovieCatalog, RepositoryError};
use crate::infrastructure::database::{db_error, is_unique_violation_on};

/// SQLite implementation of MovieCatalog
pub struct SqliteMovieRepository {
    pool: SqlitePool,
}

impl SqliteMovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_movie(row: &sqlx::sqlite::SqliteRow) -> Movie {
        use sqlx::Row;

        let genres_json: String = row.get("genres");

        Movie {
            id: row.get("id"),
            external_id: row.get("external_id"),
            title: row.get("title"),
            release_date: row.get("release_date"),
            overview: row.get("overview"),
            tagline: row.get("tagline"),
            poster_url: row.get("poster_url"),
            trailer_url: row.get("trailer_url"),
            runtime: row.get("runtime"),
            rating: row.get("rating"),
            genres: serde_json::from_str(&genres_json).unwrap_or_default(),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl MovieCatalog for SqliteMovieRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM movies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.as_ref().map(Self::row_to_movie))
    }

    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<Movie>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM movies WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.as_ref().map(Self::row_to_movie))
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, RepositoryError> {
        let now = chrono::Utc::now().timestamp();
        let genres_json =
            serde_json::to_string(&movie.genres).map_err(|e| RepositoryError::Database(e.to_string()))?;

        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO movies (external_id, title, release_date, overview, tagline,
                                poster_url, trailer_url, runtime, rating, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(movie.external_id)
        .bind(&movie.title)
        .bind(&movie.release_date)
        .bind(&movie.overview)
        .bind(&movie.tagline)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .bind(movie.runtime)
        .bind(movie.rating)
        .bind(&genres_json)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(id) => Ok(Movie {
                id,
                external_id: movie.external_id,
                title: movie.title.clone(),
                release_date: movie.release_date.clone(),
                overview: movie.overview.clone(),
                tagline: movie.tagline.clone(),
                poster_url: movie.poster_url.clone(),
                trailer_url: movie.trailer_url.clone(),
                runtime: movie.runtime,
                rating: movie.rating,
                genres: movie.genres.clone(),
                created_at: now,
            }),
            // Another request stored it first; theirs is canonical
            Err(e) if is_unique_violation_on(&e, "movies.external_id") => self
                .find_by_external_id(movie.external_id)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(format!("movie {}", movie.external_id))),
            Err(e) => Err(db_error(e)),
        }
    }
}
