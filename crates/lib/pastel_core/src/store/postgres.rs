//! PostgreSQL credential store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::models::account::{Account, AccountChanges, NewAccount, PasswordDigest, Role};

type AccountRow = (Uuid, String, String, String, String, DateTime<Utc>);

const ACCOUNT_COLUMNS: &str = "id, display_name, email, password_digest, role, created_at";

/// Account store backed by the `accounts` table.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(
    (id, display_name, email, password_digest, role, created_at): AccountRow,
) -> Account {
    let role = role.parse::<Role>().unwrap_or_else(|e| {
        // The CHECK constraint makes this unreachable short of manual edits.
        warn!(account_id = %id, "{e}; treating as user");
        Role::User
    });
    Account {
        id,
        display_name,
        email,
        password_digest: PasswordDigest::new(password_digest),
        role,
        created_at,
    }
}

/// Map a unique-index violation on `accounts.email` to `DuplicateEmail`.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return StoreError::DuplicateEmail;
    }
    StoreError::Db(e)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO accounts (display_name, email, password_digest, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.display_name)
        .bind(&account.email)
        .bind(account.password_digest.as_str())
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(account_from_row(row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(account_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(account_from_row))
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(account_from_row).collect())
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE accounts SET \
               display_name = COALESCE($2, display_name), \
               email = COALESCE($3, email), \
               password_digest = COALESCE($4, password_digest), \
               role = COALESCE($5, role) \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.display_name)
        .bind(changes.email)
        .bind(changes.password_digest.as_ref().map(PasswordDigest::as_str))
        .bind(changes.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        row.map(account_from_row).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
