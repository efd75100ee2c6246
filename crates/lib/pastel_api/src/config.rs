//! API server configuration.

use pastel_core::auth::AuthConfig;
use thiserror::Error;

/// Configuration rejected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when APP_ENV is production")]
    DevSecretInProduction,
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Frontend origin allowed by CORS.
    pub cors_origin: String,
    /// Deployment environment name, reported by the health route.
    pub environment: String,
    /// Token signing secret and lifetime.
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable         | Default                             |
    /// |------------------|-------------------------------------|
    /// | `BIND_ADDR`      | `127.0.0.1:3000`                    |
    /// | `DATABASE_URL`   | `postgres://localhost:5432/pastel`  |
    /// | `CORS_ORIGIN`    | `http://localhost:3001`             |
    /// | `APP_ENV`        | `development`                       |
    /// | `JWT_SECRET`     | insecure development secret         |
    /// | `JWT_EXPIRES_IN` | `2h`                                |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/pastel".into()),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            auth: AuthConfig::from_env(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Refuse to run production on the development signing secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.auth.uses_dev_secret() {
            return Err(ConfigError::DevSecretInProduction);
        }
        Ok(())
    }
}
