//! Database migration support.
//!
//! The `accounts` schema lives in `pastel_core/migrations/` and is compiled
//! into the binary.

use sqlx::PgPool;

/// Run all embedded database migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
