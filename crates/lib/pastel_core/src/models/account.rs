//! Account domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalize an email for storage and comparison: trimmed, lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Output of the password hasher.
///
/// Neither `Serialize` nor `Display`; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest produced by the hasher or loaded from storage.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Canonical account record as held by a credential store.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub display_name: String,
    /// Normalized email (see [`normalize_email`]).
    pub email: String,
    pub password_digest: PasswordDigest,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Public projection of the account, without the password digest.
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Insert payload for a credential store. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub display_name: String,
    pub email: String,
    pub password_digest: PasswordDigest,
    pub role: Role,
}

/// Partial update for a credential store; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password_digest: Option<PasswordDigest>,
    pub role: Option<Role>,
}

impl AccountChanges {
    /// Apply the changes to an in-memory record.
    pub fn apply_to(self, account: &mut Account) {
        if let Some(display_name) = self.display_name {
            account.display_name = display_name;
        }
        if let Some(email) = self.email {
            account.email = email;
        }
        if let Some(digest) = self.password_digest {
            account.password_digest = digest;
        }
        if let Some(role) = self.role {
            account.role = role;
        }
    }
}

/// Account as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
