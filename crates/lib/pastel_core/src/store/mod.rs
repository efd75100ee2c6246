//! Credential store: persistence for account records.
//!
//! Stores receive emails already normalized and must enforce email uniqueness
//! themselves, atomically. A violation is reported as
//! [`StoreError::DuplicateEmail`], which callers treat as the authoritative
//! conflict signal.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::account::{Account, AccountChanges, NewAccount};

pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Persistence operations on accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account, assigning its id and creation time.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Look up an account by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// All accounts, newest first.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply a partial update, returning the updated record.
    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, StoreError>;

    /// Delete an account. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Whether the backing storage is reachable.
    async fn ping(&self) -> bool;
}
