//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT session tokens and the [`AuthService`]
//! that orchestrates them over an [`AccountStore`](crate::store::AccountStore).

pub mod config;
pub mod jwt;
pub mod onboarding;
pub mod password;
pub mod service;

use thiserror::Error;

use crate::store::StoreError;

pub use config::AuthConfig;
pub use jwt::TokenIssuer;
pub use onboarding::{NoOnboarding, Onboarding, OnboardingError};
pub use password::PasswordHasher;
pub use service::{AccountUpdate, AuthService};

/// Session token verification failures.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered")]
    Conflict,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::Conflict,
            StoreError::NotFound => AuthError::AccountNotFound,
            other => AuthError::Store(other),
        }
    }
}
