use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Invitation, NewInvitation};
use crate::domain::repositories::{InvitationRepository, RepositoryError};
use crate::infrastructure::database::{db_error, is_unique_violation_on};

/// SQLite implementation of InvitationRepository
pub struct SqliteInvitationRepository {
    pool: SqlitePool,
}

impl SqliteInvitationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_invitation(row: &sqlx::sqlite::SqliteRow) -> Invitation {
        use sqlx::Row;

        Invitation {
            id: row.get("id"),
            party_id: row.get("party_id"),
            email: row.get("email"),
            profile_id: row.get("profile_id"),
            invited_by: row.get("invited_by"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl InvitationRepository for SqliteInvitationRepository {
    async fn create_invitation(&self, invite: &NewInvitation) -> Result<Invitation, RepositoryError> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query(
            r#"
            INSERT INTO invitations (party_id, email, profile_id, invited_by, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, party_id, email, profile_id, invited_by, created_at
            "#,
        )
        .bind(invite.party_id)
        .bind(&invite.email)
        .bind(invite.profile_id)
        .bind(invite.invited_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "invitations.party_id, invitations.email") {
                RepositoryError::AlreadyExists(format!("invitation for {}", invite.email))
            } else {
                db_error(e)
            }
        })?;

        Ok(Self::row_to_invitation(&row))
    }

    async fn list_for_party(&self, party_id: i64) -> Result<Vec<Invitation>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, party_id, email, profile_id, invited_by, created_at
            FROM invitations
            WHERE party_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(party_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.iter().map(Self::row_to_invitation).collect())
    }
}
