//! Pastel API server binary.
//!
//! Loads `.env`, connects to PostgreSQL, runs migrations and serves the
//! account/session API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use pastel_api::config::ApiConfig;
use pastel_core::auth::{AuthError, AuthService};
use pastel_core::models::account::Role;
use pastel_core::store::{AccountStore, InMemoryAccountStore, PgAccountStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments; each falls back to its environment variable.
#[derive(Parser, Debug)]
#[command(name = "pastel_api_server", about = "Pastel account and session API")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR")]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep accounts in process memory instead of PostgreSQL.
    ///
    /// Everything is lost on exit; meant for local frontend work.
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Promote the account registered under this email to admin at startup.
    #[arg(long, env = "ADMIN_EMAIL")]
    admin_email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pastel_api=debug,pastel_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    config.validate()?;

    info!(
        bind_addr = %config.bind_addr,
        environment = %config.environment,
        in_memory = args.in_memory,
        "starting pastel_api_server"
    );

    let store: Arc<dyn AccountStore> = if args.in_memory {
        warn!("using in-memory account store; accounts will not survive a restart");
        Arc::new(InMemoryAccountStore::new())
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;

        info!("running database migrations");
        pastel_core::migrate::migrate(&pool).await?;

        Arc::new(PgAccountStore::new(pool))
    };

    let auth = AuthService::new(store, &config.auth);

    if let Some(email) = args.admin_email.as_deref() {
        match auth.set_role_by_email(email, Role::Admin).await {
            Ok(account) => info!(account_id = %account.id, "admin role granted"),
            Err(AuthError::AccountNotFound) => {
                warn!("admin email is not registered yet; register it and restart")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let state = pastel_api::AppState {
        auth: Arc::new(auth),
        config: config.clone(),
    };
    let app = pastel_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
