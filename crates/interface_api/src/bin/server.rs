//! CMCS API Server Binary
//!
//! Starts the HTTP API server for the claim management system.
//!
//! # Usage
//!
//! ```bash
//! # In-memory stores with demo users
//! CMCS_SEED_DEMO_USERS=true cargo run --bin cmcs-api
//!
//! # PostgreSQL
//! CMCS_DATABASE_URL=postgres://... cargo run --bin cmcs-api
//! ```
//!
//! # Environment Variables
//!
//! * `CMCS_HOST` - Server host (default: 0.0.0.0)
//! * `CMCS_PORT` - Server port (default: 8080)
//! * `CMCS_JWT_SECRET` - JWT signing secret (required in production)
//! * `CMCS_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `CMCS_DATABASE_URL` - PostgreSQL connection string; in-memory stores when unset
//! * `CMCS_LOG_LEVEL` - Log level used when `RUST_LOG` is unset (default: info)
//! * `CMCS_SEED_DEMO_USERS` - Seed one user per role into an empty directory
//! * `CMCS_CURRENCY` - Payment currency (default: ZAR)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{Clock, DefaultClock};
use domain_claims::{ClaimStore, InMemoryClaimStore};
use domain_identity::{InMemoryUserDirectory, UserDirectory};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore, PostgresUserDirectory};
use interface_api::{config::ApiConfig, create_router, seed::seed_demo_users, AppState};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Database connection or migrations fail
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;
    init_tracing(&config.log_level);
    config.validate()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting CMCS API Server"
    );

    let (users, claims) = build_stores(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    if config.seed_demo_users {
        seed_demo_users(users.as_ref(), clock.utc()).await?;
    }

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(config, users, claims, clock)?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// PostgreSQL adapters when a database URL is configured, in-memory otherwise
async fn build_stores(
    config: &ApiConfig,
) -> Result<(Arc<dyn UserDirectory>, Arc<dyn ClaimStore>), Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(DatabaseConfig::new(url.clone())).await?;
            run_migrations(&pool).await?;
            tracing::info!("Database ready");
            Ok((
                Arc::new(PostgresUserDirectory::new(pool.clone())),
                Arc::new(PostgresClaimStore::new(pool)),
            ))
        }
        None => {
            tracing::warn!("CMCS_DATABASE_URL not set, using in-memory stores");
            Ok((
                Arc::new(InMemoryUserDirectory::new()),
                Arc::new(InMemoryClaimStore::new()),
            ))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
