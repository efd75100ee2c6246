//! Authentication service: registration, login and account administration.
//!
//! Orchestrates an [`AccountStore`], the [`PasswordHasher`] and the
//! [`TokenIssuer`]. Holds no account state of its own beyond a single call.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::AuthConfig;
use super::jwt::TokenIssuer;
use super::onboarding::{NoOnboarding, Onboarding};
use super::password::PasswordHasher;
use super::{AuthError, TokenError};
use crate::models::account::{
    Account, AccountChanges, AccountView, NewAccount, Role, normalize_email,
};
use crate::models::auth::{AuthSession, TokenClaims};
use crate::store::AccountStore;

/// Requested changes to an account, as plaintext input.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

pub struct AuthService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    onboarding: Arc<dyn Onboarding>,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccountStore>, config: &AuthConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasher::default(),
            tokens: TokenIssuer::new(config),
            onboarding: Arc::new(NoOnboarding),
        }
    }

    /// Replace the password hasher (tests use a lower cost).
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_onboarding(mut self, onboarding: Arc<dyn Onboarding>) -> Self {
        self.onboarding = onboarding;
        self
    }

    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new account with role `user` and return it with a fresh token.
    ///
    /// The email pre-check only produces a friendlier error; the store's
    /// uniqueness constraint decides concurrent registrations.
    pub async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let display_name = display_name.trim();
        let email = normalize_email(email);

        let mut missing = Vec::new();
        if display_name.is_empty() {
            missing.push("displayName");
        }
        if email.is_empty() {
            missing.push("email");
        }
        if password.trim().is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(AuthError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            debug!("registration rejected: email already registered");
            return Err(AuthError::Conflict);
        }

        let password_digest = self.hasher.hash_blocking(password.to_string()).await?;
        let account = self
            .store
            .insert(NewAccount {
                display_name: display_name.to_string(),
                email,
                password_digest,
                role: Role::User,
            })
            .await?;
        info!(account_id = %account.id, "account registered");

        let session = self.session_for(&account)?;

        if let Err(e) = self.onboarding.on_registered(&account).await {
            warn!(account_id = %account.id, error = %e, "onboarding failed; keeping account");
        }

        Ok(session)
    }

    /// Authenticate with email + password.
    ///
    /// Unknown email and wrong password produce the same error, and the
    /// unknown-email path still pays for one bcrypt verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".into(),
            ));
        }

        let Some(account) = self.store.find_by_email(&email).await? else {
            self.hasher.verify_dummy_blocking(password.to_string()).await;
            debug!("login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify_blocking(password.to_string(), account.password_digest.clone())
            .await?;
        if !valid {
            debug!(account_id = %account.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(account_id = %account.id, "login succeeded");
        self.session_for(&account)
    }

    /// Verify a bearer token without touching the store.
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.tokens.verify(token)
    }

    /// Load the current record of the account a token was issued to.
    ///
    /// Used where the caller's *current* role matters; a token whose account
    /// has since been deleted is treated as invalid.
    pub async fn resolve_caller(&self, claims: &TokenClaims) -> Result<Account, AuthError> {
        let id = claims
            .account_id()
            .ok_or_else(|| TokenError::Invalid("subject is not an account id".into()))?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| TokenError::Invalid("account no longer exists".into()).into())
    }

    /// Resolve the caller and require the admin role.
    pub async fn require_admin(&self, claims: &TokenClaims) -> Result<Account, AuthError> {
        let caller = self.resolve_caller(claims).await?;
        if caller.role != Role::Admin {
            return Err(AuthError::Forbidden("Admin role required".into()));
        }
        Ok(caller)
    }

    /// Resolve the caller and require that it is `target` itself or an admin.
    pub async fn require_self_or_admin(
        &self,
        claims: &TokenClaims,
        target: Uuid,
    ) -> Result<Account, AuthError> {
        let caller = self.resolve_caller(claims).await?;
        if caller.id != target && caller.role != Role::Admin {
            return Err(AuthError::Forbidden(
                "Not allowed to access this account".into(),
            ));
        }
        Ok(caller)
    }

    pub async fn get_account(&self, id: Uuid) -> Result<AccountView, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .map(|account| account.view())
            .ok_or(AuthError::AccountNotFound)
    }

    /// All accounts, newest first.
    pub async fn list_accounts(&self) -> Result<Vec<AccountView>, AuthError> {
        let accounts = self.store.list().await?;
        Ok(accounts.iter().map(Account::view).collect())
    }

    /// Apply `update` to account `id` on behalf of `caller`.
    ///
    /// Only admins may change roles. Provided fields must be non-empty; the
    /// email is normalized and must stay unique; a new password is re-hashed.
    pub async fn update_account(
        &self,
        caller: &Account,
        id: Uuid,
        update: AccountUpdate,
    ) -> Result<AccountView, AuthError> {
        if update.role.is_some() && caller.role != Role::Admin {
            return Err(AuthError::Forbidden("Only admins can change roles".into()));
        }

        let mut changes = AccountChanges {
            role: update.role,
            ..Default::default()
        };
        let mut empty = Vec::new();

        if let Some(display_name) = update.display_name {
            let display_name = display_name.trim();
            if display_name.is_empty() {
                empty.push("displayName");
            } else {
                changes.display_name = Some(display_name.to_string());
            }
        }
        if let Some(email) = update.email {
            let email = normalize_email(&email);
            if email.is_empty() {
                empty.push("email");
            } else {
                changes.email = Some(email);
            }
        }
        let password = match update.password {
            Some(password) if password.trim().is_empty() => {
                empty.push("password");
                None
            }
            other => other,
        };
        if !empty.is_empty() {
            return Err(AuthError::Validation(format!(
                "Fields must not be empty: {}",
                empty.join(", ")
            )));
        }

        if let Some(email) = &changes.email
            && let Some(existing) = self.store.find_by_email(email).await?
            && existing.id != id
        {
            return Err(AuthError::Conflict);
        }

        if let Some(password) = password {
            changes.password_digest = Some(self.hasher.hash_blocking(password).await?);
        }

        let updated = self.store.update(id, changes).await?;
        info!(account_id = %id, by = %caller.id, "account updated");
        Ok(updated.view())
    }

    pub async fn delete_account(&self, id: Uuid) -> Result<(), AuthError> {
        if !self.store.delete(id).await? {
            return Err(AuthError::AccountNotFound);
        }
        info!(account_id = %id, "account deleted");
        Ok(())
    }

    /// Set the role of the account registered under `email`.
    ///
    /// Operator path used at startup to bootstrap administrators.
    pub async fn set_role_by_email(
        &self,
        email: &str,
        role: Role,
    ) -> Result<AccountView, AuthError> {
        let email = normalize_email(email);
        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        let changes = AccountChanges {
            role: Some(role),
            ..Default::default()
        };
        let updated = self.store.update(account.id, changes).await?;
        info!(account_id = %updated.id, %role, "account role set");
        Ok(updated.view())
    }

    fn session_for(&self, account: &Account) -> Result<AuthSession, AuthError> {
        let token = self.tokens.issue(account.id, &account.email, account.role)?;
        Ok(AuthSession {
            account: account.view(),
            token,
        })
    }
}
