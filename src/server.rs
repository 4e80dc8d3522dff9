//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connections, migrations and the Axum
//! server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{BookingRepository, DocumentRepository};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{PgBookingRepository, PgDocumentRepository};
use crate::routes::app_router;
use crate::state::{AppState, CookieSettings};
use crate::utils::jwt::JwtCodec;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the connection pool described by `config` and applies migrations.
///
/// # Errors
///
/// Returns an error if no database URL is configured, the connection fails
/// or a migration cannot be applied.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required with STORAGE=postgres")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

async fn open_stores(
    config: &Config,
) -> Result<(Arc<dyn DocumentRepository>, Arc<dyn BookingRepository>)> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            let documents: Arc<dyn DocumentRepository> =
                Arc::new(PgDocumentRepository::new(pool.clone()));
            let bookings: Arc<dyn BookingRepository> = Arc::new(PgBookingRepository::new(pool));
            Ok((documents, bookings))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            let documents: Arc<dyn DocumentRepository> = store.clone();
            let bookings: Arc<dyn BookingRepository> = store;
            Ok((documents, bookings))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The configured storage backend (PostgreSQL pool with migrations, or memory)
/// - Services and the token codec
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (documents, bookings) = open_stores(&config).await?;

    let state = AppState::new(
        documents,
        bookings,
        JwtCodec::new(&config.jwt_secret, config.jwt_ttl_seconds),
        CookieSettings {
            secure: config.cookie_secure,
        },
    );

    let app = app_router(state, config.rate_limit_enabled);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
