//! Auth configuration: signing secret and token lifetime.

use std::fmt;

use chrono::Duration;
use tracing::warn;

/// Fallback signing secret used when `JWT_SECRET` is unset. Development only.
pub const DEV_JWT_SECRET: &str = "jwt_secret_development";

/// Default session token lifetime: 2 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// Immutable auth settings, built once at startup and shared by reference.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: String,
    /// Lifetime of issued session tokens.
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    /// Reads `JWT_SECRET` and `JWT_EXPIRES_IN` from the environment.
    ///
    /// An invalid `JWT_EXPIRES_IN` falls back to the default lifetime.
    pub fn from_env() -> Self {
        let token_ttl = match std::env::var("JWT_EXPIRES_IN") {
            Ok(raw) => parse_ttl(&raw).unwrap_or_else(|e| {
                warn!(value = %raw, "invalid JWT_EXPIRES_IN ({e}); using default");
                default_token_ttl()
            }),
            Err(_) => default_token_ttl(),
        };
        Self {
            jwt_secret: resolve_jwt_secret(),
            token_ttl,
        }
    }

    /// Whether the insecure development secret is in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

pub fn default_token_ttl() -> Duration {
    Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
}

/// Resolve the JWT secret: env var `JWT_SECRET`, else the development default.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.trim().is_empty()
    {
        return secret;
    }
    warn!("JWT_SECRET is not set; signing tokens with the insecure development secret");
    DEV_JWT_SECRET.to_string()
}

/// Parse a token lifetime such as `2h`, `30m`, `45s`, `7d` or plain seconds (`3600`).
pub fn parse_ttl(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty duration".into());
    }

    let (digits, unit_secs) = match value.char_indices().last() {
        Some((idx, 's')) => (&value[..idx], 1),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 'h')) => (&value[..idx], 60 * 60),
        Some((idx, 'd')) => (&value[..idx], 24 * 60 * 60),
        _ => (value, 1),
    };

    let amount: i64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a duration"))?;
    if amount <= 0 {
        return Err(format!("'{value}' must be positive"));
    }

    amount
        .checked_mul(unit_secs)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| format!("'{value}' is out of range"))
}
