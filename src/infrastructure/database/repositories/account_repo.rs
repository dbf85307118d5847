use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Account, Profile};
use crate::domain::repositories::{AccountRepository, AccountUpdate, RepositoryError};
use crate::infrastructure::database::{db_error, is_unique_violation_on};

use super::profile_repo::SqliteProfileRepository;

/// SQLite implementation of AccountRepository
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> (Account, Profile) {
        use sqlx::Row;

        let account = Account {
            id: row.get("account_id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("account_created_at"),
        };
        (account, SqliteProfileRepository::row_to_profile(row))
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create_account_with_profile(
        &self,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, RepositoryError> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let account_id: i64 = sqlx::query_scalar(
            "INSERT INTO accounts (email, password_hash, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "accounts.email") {
                RepositoryError::AlreadyExists(format!("account {}", email))
            } else {
                db_error(e)
            }
        })?;

        let profile_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO profiles (account_id, first_name, last_name, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(account_id)
        .bind(first_name)
        .bind(last_name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(Profile {
            id: profile_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            account_id,
            email: email.to_string(),
            created_at: now,
        })
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Account, Profile)>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.first_name, p.last_name, p.account_id, p.created_at,
                   a.email, a.password_hash, a.created_at AS account_created_at
            FROM accounts a
            JOIN profiles p ON p.account_id = a.id
            WHERE a.email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    async fn find_by_profile_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<(Account, Profile)>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.first_name, p.last_name, p.account_id, p.created_at,
                   a.email, a.password_hash, a.created_at AS account_created_at
            FROM profiles p
            JOIN accounts a ON a.id = p.account_id
            WHERE p.id = ?
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    async fn update_account(&self, update: &AccountUpdate) -> Result<Profile, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let updated: Option<(i64, i64)> = sqlx::query_as(
            r#"
            UPDATE profiles SET first_name = ?, last_name = ?
            WHERE id = ?
            RETURNING account_id, created_at
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.profile_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let (account_id, created_at) = updated
            .ok_or_else(|| RepositoryError::NotFound(format!("profile {}", update.profile_id)))?;

        sqlx::query(
            r#"
            UPDATE accounts
            SET email = ?, password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            "#,
        )
        .bind(&update.email)
        .bind(update.password_hash.as_deref())
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, "accounts.email") {
                RepositoryError::AlreadyExists(format!("account {}", update.email))
            } else {
                db_error(e)
            }
        })?;

        tx.commit().await.map_err(db_error)?;

        Ok(Profile {
            id: update.profile_id,
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
            account_id,
            email: update.email.clone(),
            created_at,
        })
    }
}
