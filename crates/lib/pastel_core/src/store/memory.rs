//! In-memory credential store.
//!
//! Used by tests and local runs without a database. Email uniqueness is
//! enforced through an email → id index; writes that touch the index always
//! take the index entry first and the record second, so concurrent writers
//! cannot deadlock or slip past each other.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::models::account::{Account, AccountChanges, NewAccount};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<Uuid, Account>,
    by_email: DashMap<String, Uuid>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        match self.by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let record = Account {
                    id: uuidv7(),
                    display_name: account.display_name,
                    email: account.email,
                    password_digest: account.password_digest,
                    role: account.role,
                    created_at: Utc::now(),
                };
                self.accounts.insert(record.id, record.clone());
                slot.insert(record.id);
                Ok(record)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let Some(id) = self.by_email.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(accounts)
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> Result<Account, StoreError> {
        let Some(new_email) = changes.email.clone() else {
            let mut entry = self.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
            changes.apply_to(entry.value_mut());
            return Ok(entry.value().clone());
        };

        // The previous email is read, and the new one indexed, while the record
        // guard is held; the stale key is then dropped unless the record has
        // moved back to it in the meantime.
        let (updated, previous_email) = match self.by_email.entry(new_email) {
            Entry::Occupied(owner) if *owner.get() != id => {
                return Err(StoreError::DuplicateEmail);
            }
            Entry::Occupied(_owned) => {
                let mut entry = self.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
                changes.apply_to(entry.value_mut());
                return Ok(entry.value().clone());
            }
            Entry::Vacant(slot) => {
                let mut entry = self.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
                let previous_email = entry.value().email.clone();
                changes.apply_to(entry.value_mut());
                let updated = entry.value().clone();
                slot.insert(id);
                drop(entry);
                (updated, previous_email)
            }
        };
        self.by_email.remove_if(&previous_email, |_, owner| {
            *owner == id
                && self
                    .accounts
                    .get(&id)
                    .is_none_or(|account| account.email != previous_email)
        });
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let Some((_, removed)) = self.accounts.remove(&id) else {
            return Ok(false);
        };
        self.by_email
            .remove_if(&removed.email, |_, owner| *owner == id);
        Ok(true)
    }

    async fn ping(&self) -> bool {
        true
    }
}
