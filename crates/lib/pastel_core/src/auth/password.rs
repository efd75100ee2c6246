//! Password hashing via bcrypt.

use std::sync::Arc;

use tracing::warn;

use super::AuthError;
use crate::models::account::PasswordDigest;

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Plaintext hashed at construction to produce the digest compared against
/// when a login names an unknown email, so that path costs the same as a
/// real check from the first request on.
const TIMING_DUMMY_PASSWORD: &str = "pastel-timing-equalizer";

/// Salted, slow one-way hashing of passwords.
///
/// The cost is fixed at [`BCRYPT_COST`]; [`PasswordHasher::with_cost`] exists
/// for tests and is not reachable from configuration.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy: Arc<Option<PasswordDigest>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_cost(BCRYPT_COST)
    }
}

impl PasswordHasher {
    /// Build a hasher; pays for one hash up front to prepare the dummy digest.
    pub fn with_cost(cost: u32) -> Self {
        let dummy = bcrypt::hash(TIMING_DUMMY_PASSWORD, cost)
            .map(PasswordDigest::new)
            .map_err(|e| warn!(cost, "cannot prepare dummy digest: {e}"))
            .ok();
        Self {
            cost,
            dummy: Arc::new(dummy),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordDigest, AuthError> {
        bcrypt::hash(password, self.cost)
            .map(PasswordDigest::new)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }

    /// Verify a password against a bcrypt digest.
    ///
    /// A digest that is not valid bcrypt output is an error, not a mismatch.
    pub fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, AuthError> {
        bcrypt::verify(password, digest.as_str())
            .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
    }

    /// Burn one verification's worth of time against a fixed digest.
    pub fn verify_dummy(&self, password: &str) {
        if let Some(digest) = &*self.dummy {
            let _ = self.verify(password, digest);
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> Result<PasswordDigest, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(
        &self,
        password: String,
        digest: PasswordDigest,
    ) -> Result<bool, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking thread pool.
    pub async fn verify_dummy_blocking(&self, password: String) {
        let hasher = self.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}
