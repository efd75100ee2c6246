//! Authentication domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{AccountView, Role};

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: account ID (standard JWT `sub` claim).
    pub sub: String,
    /// Normalized account email at issue time.
    pub email: String,
    /// Account role at issue time.
    pub role: Role,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

impl TokenClaims {
    /// The subject as an account id, if it is a well-formed UUID.
    pub fn account_id(&self) -> Option<Uuid> {
        crate::uuid::parse_account_id(&self.sub)
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub account: AccountView,
    pub token: String,
}
