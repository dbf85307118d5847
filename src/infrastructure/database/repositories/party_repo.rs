use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{
    Party, PartyMember, PartyMovie, PartyMovieDetails, WatchStatus,
};
use crate::domain::repositories::{PartyRepository, RepositoryError, SelectionCandidate};
use crate::infrastructure::database::{db_error, is_unique_violation_on};

use super::movie_repo::SqliteMovieRepository;

const PARTY_MOVIE_COLUMNS: &str =
    "party_id, movie_id, added_by, watch_status, watch_date, created_at";

/// SQLite implementation of PartyRepository
pub struct SqlitePartyRepository {
    pool: SqlitePool,
}

impl SqlitePartyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_party(row: &sqlx::sqlite::SqliteRow) -> Party {
        use sqlx::Row;

        Party {
            id: row.get("id"),
            name: row.get("name"),
            join_code: row.get("join_code"),
            owner_id: row.get("owner_id"),
            created_at: row.get("created_at"),
        }
    }

    fn row_to_member(row: &sqlx::sqlite::SqliteRow) -> PartyMember {
        use sqlx::Row;

        PartyMember {
            member_id: row.get("member_id"),
            party_id: row.get("party_id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            owner: row.get::<i64, _>("owner") != 0,
            joined_at: row.get("joined_at"),
        }
    }

    fn row_to_party_movie(row: &sqlx::sqlite::SqliteRow) -> Result<PartyMovie, RepositoryError> {
        use sqlx::Row;

        Ok(PartyMovie {
            party_id: row.get("party_id"),
            movie_id: row.get("movie_id"),
            added_by: row.get("added_by"),
            watch_status: parse_status(&row.get::<String, _>("watch_status"))?,
            watch_date: row.get("watch_date"),
            created_at: row.get("created_at"),
        })
    }

    fn row_to_details(row: &sqlx::sqlite::SqliteRow) -> Result<PartyMovieDetails, RepositoryError> {
        use sqlx::Row;

        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");

        Ok(PartyMovieDetails {
            movie: SqliteMovieRepository::row_to_movie(row),
            added_by: row.get("added_by"),
            added_by_name: format!("{} {}", first_name, last_name),
            watch_status: parse_status(&row.get::<String, _>("watch_status"))?,
            watch_date: row.get("watch_date"),
            added_on: row.get("added_on"),
        })
    }

    /// Explain why a guarded status update matched no row
    async fn rejected_status_change(
        &self,
        party_id: i64,
        movie_id: i64,
        status: WatchStatus,
    ) -> RepositoryError {
        match self.find_party_movie(party_id, movie_id).await {
            Ok(None) => RepositoryError::NotFound(format!("movie {} on party {}", movie_id, party_id)),
            // Another caller picked this same movie first
            Ok(Some(current))
                if status == WatchStatus::Selected && current.watch_status == WatchStatus::Selected =>
            {
                RepositoryError::SelectionOccupied
            }
            Ok(Some(current)) if !current.watch_status.can_transition_to(status) => {
                RepositoryError::InvalidTransition {
                    from: current.watch_status,
                    to: status,
                }
            }
            // Transition was legal, so the selected slot was taken
            Ok(Some(_)) => RepositoryError::SelectionOccupied,
            Err(e) => e,
        }
    }
}

/// Stored statuses are constrained by the schema; anything else is corruption
fn parse_status(raw: &str) -> Result<WatchStatus, RepositoryError> {
    WatchStatus::from_str(raw)
        .ok_or_else(|| RepositoryError::Database(format!("unknown watch status '{}'", raw)))
}

#[async_trait]
impl PartyRepository for SqlitePartyRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Party>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM parties WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.as_ref().map(Self::row_to_party))
    }

    async fn find_by_join_code(&self, code: &str) -> Result<Option<Party>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM parties WHERE join_code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.as_ref().map(Self::row_to_party))
    }

    async fn create_party(
        &self,
        owner_id: i64,
        name: &str,
        join_code: &str,
    ) -> Result<Party, RepositoryError> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO parties (name, join_code, owner_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(join_code)
        .bind(owner_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "parties.join_code") {
                RepositoryError::DuplicateJoinCode
            } else {
                db_error(e)
            }
        })?;

        // Dropping the transaction on error rolls back the party row too
        sqlx::query(
            "INSERT INTO party_members (member_id, party_id, owner, joined_at) VALUES (?, ?, 1, ?)",
        )
        .bind(owner_id)
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(Party {
            id,
            name: name.to_string(),
            join_code: join_code.to_string(),
            owner_id,
            created_at: now,
        })
    }

    async fn create_membership(&self, member_id: i64, party_id: i64) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO party_members (member_id, party_id, owner, joined_at) VALUES (?, ?, 0, ?)",
        )
        .bind(member_id)
        .bind(party_id)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "party_members.member_id, party_members.party_id") {
                RepositoryError::DuplicateMembership
            } else {
                db_error(e)
            }
        })?;

        Ok(())
    }

    async fn is_member(&self, party_id: i64, member_id: i64) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM party_members WHERE party_id = ? AND member_id = ?",
        )
        .bind(party_id)
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn get_party_members(&self, party_id: i64) -> Result<Vec<PartyMember>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT pm.member_id, pm.party_id, pm.owner, pm.joined_at, p.first_name, p.last_name
            FROM party_members pm
            JOIN profiles p ON p.id = pm.member_id
            WHERE pm.party_id = ?
            ORDER BY pm.joined_at ASC, pm.id ASC
            "#,
        )
        .bind(party_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(Self::row_to_member).collect())
    }

    async fn add_movie_to_party(
        &self,
        party_id: i64,
        movie_id: i64,
        added_by: i64,
    ) -> Result<PartyMovie, RepositoryError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO party_movies (party_id, movie_id, added_by, watch_status, created_at)
            VALUES (?, ?, ?, 'unwatched', ?)
            "#,
        )
        .bind(party_id)
        .bind(movie_id)
        .bind(added_by)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "party_movies.party_id, party_movies.movie_id") {
                RepositoryError::AlreadyExists(format!("movie {} on party {}", movie_id, party_id))
            } else {
                db_error(e)
            }
        })?;

        Ok(PartyMovie {
            party_id,
            movie_id,
            added_by,
            watch_status: WatchStatus::Unwatched,
            watch_date: None,
            created_at: now,
        })
    }

    async fn find_party_movie(
        &self,
        party_id: i64,
        movie_id: i64,
    ) -> Result<Option<PartyMovie>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM party_movies WHERE party_id = ? AND movie_id = ?",
            PARTY_MOVIE_COLUMNS
        ))
        .bind(party_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(Self::row_to_party_movie).transpose()
    }

    async fn find_selected_movie(&self, party_id: i64) -> Result<Option<PartyMovie>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM party_movies WHERE party_id = ? AND watch_status = 'selected'",
            PARTY_MOVIE_COLUMNS
        ))
        .bind(party_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(Self::row_to_party_movie).transpose()
    }

    async fn get_party_movies(&self, party_id: i64) -> Result<Vec<PartyMovieDetails>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.external_id, m.title, m.release_date, m.overview, m.tagline,
                   m.poster_url, m.trailer_url, m.runtime, m.rating, m.genres, m.created_at,
                   pm.added_by, pm.watch_status, pm.watch_date, pm.created_at AS added_on,
                   p.first_name, p.last_name
            FROM party_movies pm
            JOIN movies m ON m.id = pm.movie_id
            JOIN profiles p ON p.id = pm.added_by
            WHERE pm.party_id = ?
            ORDER BY pm.created_at DESC, pm.id DESC
            "#,
        )
        .bind(party_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(Self::row_to_details).collect()
    }

    async fn list_unwatched_candidates(
        &self,
        party_id: i64,
    ) -> Result<Vec<SelectionCandidate>, RepositoryError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT movie_id, added_by
            FROM party_movies
            WHERE party_id = ? AND watch_status = 'unwatched'
            ORDER BY id ASC
            "#,
        )
        .bind(party_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|(movie_id, added_by)| SelectionCandidate { movie_id, added_by })
            .collect())
    }

    async fn set_movie_status(
        &self,
        party_id: i64,
        movie_id: i64,
        status: WatchStatus,
        now: i64,
    ) -> Result<PartyMovie, RepositoryError> {
        // Single guarded statement. A deferred transaction upgrading its read
        // lock gets SQLITE_BUSY under concurrent writers.
        let from: Vec<&str> = WatchStatus::ALL
            .iter()
            .filter(|s| s.can_transition_to(status))
            .map(|s| s.as_str())
            .collect();
        if from.is_empty() {
            return Err(self.rejected_status_change(party_id, movie_id, status).await);
        }

        let slot_guard = if status == WatchStatus::Selected {
            " AND NOT EXISTS (SELECT 1 FROM party_movies WHERE party_id = ? AND watch_status = 'selected')"
        } else {
            ""
        };
        let sql = format!(
            "UPDATE party_movies SET watch_status = ?, watch_date = ? \
             WHERE party_id = ? AND movie_id = ? AND watch_status IN ({}){} \
             RETURNING {}",
            vec!["?"; from.len()].join(", "),
            slot_guard,
            PARTY_MOVIE_COLUMNS
        );

        let watch_date = match status {
            WatchStatus::Watched => Some(now),
            _ => None,
        };

        let mut query = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(watch_date)
            .bind(party_id)
            .bind(movie_id);
        for s in &from {
            query = query.bind(*s);
        }
        if status == WatchStatus::Selected {
            query = query.bind(party_id);
        }

        // The partial unique index still backs the slot guard
        let row = query.fetch_optional(&self.pool).await.map_err(|e| {
            if is_unique_violation_on(&e, "party_movies.party_id") {
                RepositoryError::SelectionOccupied
            } else {
                db_error(e)
            }
        })?;

        match row {
            Some(row) => Self::row_to_party_movie(&row),
            None => Err(self.rejected_status_change(party_id, movie_id, status).await),
        }
    }
}
