use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{PartySummary, Profile, ProfileStats, WatchedMovie};
use crate::domain::repositories::{ProfileRepository, RepositoryError};
use crate::infrastructure::database::db_error;

/// SQLite implementation of ProfileRepository
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Profile {
        use sqlx::Row;

        Profile {
            id: row.get("id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            account_id: row.get("account_id"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        }
    }

    fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> PartySummary {
        use sqlx::Row;

        PartySummary {
            id: row.get("id"),
            name: row.get("name"),
            owner_id: row.get("owner_id"),
            member_count: row.get("member_count"),
            movie_count: row.get("movie_count"),
            created_at: row.get("created_at"),
        }
    }

    fn row_to_watched(row: &sqlx::sqlite::SqliteRow) -> WatchedMovie {
        use sqlx::Row;

        WatchedMovie {
            movie_id: row.get("movie_id"),
            title: row.get("title"),
            watch_date: row.get("watch_date"),
            party_name: row.get("party_name"),
        }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn get_profile_by_id(&self, id: i64) -> Result<Profile, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.first_name, p.last_name, p.account_id, p.created_at, a.email
            FROM profiles p
            JOIN accounts a ON a.id = p.account_id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(Self::row_to_profile)
            .ok_or_else(|| RepositoryError::NotFound(format!("profile {}", id)))
    }

    async fn get_profile_stats(&self, id: i64) -> Result<ProfileStats, RepositoryError> {
        let party_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM party_members WHERE member_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;

        let (watch_time_minutes, movies_watched): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(m.runtime), 0), COUNT(*)
            FROM party_movies pm
            JOIN movies m ON m.id = pm.movie_id
            JOIN party_members mem ON mem.party_id = pm.party_id
            WHERE mem.member_id = ? AND pm.watch_status = 'watched'
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(ProfileStats {
            party_count,
            watch_time_minutes,
            movies_watched,
        })
    }

    async fn get_parties_for_member(
        &self,
        id: i64,
        limit: i64,
    ) -> Result<Vec<PartySummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.owner_id, p.created_at,
                   (SELECT COUNT(*) FROM party_members x WHERE x.party_id = p.id) AS member_count,
                   (SELECT COUNT(*) FROM party_movies y WHERE y.party_id = p.id) AS movie_count
            FROM parties p
            JOIN party_members mem ON mem.party_id = p.id
            WHERE mem.member_id = ?
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT ?
            "#,
        )
        .bind(id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(Self::row_to_summary).collect())
    }

    async fn get_invited_parties_for_member(
        &self,
        id: i64,
        limit: i64,
    ) -> Result<Vec<PartySummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.owner_id, p.created_at,
                   (SELECT COUNT(*) FROM party_members x WHERE x.party_id = p.id) AS member_count,
                   (SELECT COUNT(*) FROM party_movies y WHERE y.party_id = p.id) AS movie_count
            FROM parties p
            JOIN invitations i ON i.party_id = p.id
            WHERE (i.profile_id = ?1 OR i.email = (
                      SELECT a.email FROM accounts a
                      JOIN profiles pr ON pr.account_id = a.id
                      WHERE pr.id = ?1))
              AND NOT EXISTS (
                      SELECT 1 FROM party_members mem
                      WHERE mem.party_id = p.id AND mem.member_id = ?1)
            GROUP BY p.id
            ORDER BY MAX(i.created_at) DESC, p.id DESC
            LIMIT ?2
            "#,
        )
        .bind(id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(Self::row_to_summary).collect())
    }

    async fn get_watched_movies_page(
        &self,
        id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<WatchedMovie>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id AS movie_id, m.title, pm.watch_date, p.name AS party_name
            FROM party_movies pm
            JOIN movies m ON m.id = pm.movie_id
            JOIN parties p ON p.id = pm.party_id
            JOIN party_members mem ON mem.party_id = pm.party_id
            WHERE mem.member_id = ? AND pm.watch_status = 'watched'
            ORDER BY pm.watch_date DESC, pm.id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(Self::row_to_watched).collect())
    }

    async fn get_watched_movies_count(&self, id: i64) -> Result<i64, RepositoryError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM party_movies pm
            JOIN party_members mem ON mem.party_id = pm.party_id
            WHERE mem.member_id = ? AND pm.watch_status = 'watched'
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }
}
