//! Post-registration onboarding hook.
//!
//! Runs after a new account has been persisted (for example to seed a
//! starter catalog). Onboarding is best-effort: the auth service logs a
//! failure and keeps the account.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::account::Account;

#[derive(Debug, Error)]
#[error("onboarding failed: {0}")]
pub struct OnboardingError(pub String);

#[async_trait]
pub trait Onboarding: Send + Sync {
    async fn on_registered(&self, account: &Account) -> Result<(), OnboardingError>;
}

/// Onboarding that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOnboarding;

#[async_trait]
impl Onboarding for NoOnboarding {
    async fn on_registered(&self, _account: &Account) -> Result<(), OnboardingError> {
        Ok(())
    }
}
