//! HTTP server initialization and runtime setup.
//!
//! Selects the mapping store and URL validator, then runs the Axum server
//! until Ctrl-C or SIGTERM.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::persistence::{InMemoryMappingRepository, PgMappingRepository};
use crate::infrastructure::validation::{DnsUrlValidator, SyntaxUrlValidator, UrlValidator};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Mapping store (PostgreSQL with migrations, or in-memory)
/// - URL validator (DNS or syntax only)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The database is unreachable at launch
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let validator = build_validator(&config);

    let state = AppState::new(repository, validator);
    let app = app_router(state, &config.views_dir, &config.static_dir);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Creates the mapping store selected by the configuration.
///
/// The PostgreSQL store fails fast: an unreachable database aborts startup.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn MappingRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; mappings are lost on restart");
            Ok(Arc::new(InMemoryMappingRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;
            Ok(Arc::new(PgMappingRepository::new(Arc::new(pool))))
        }
    }
}

/// Connects to PostgreSQL and applies pending migrations.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_* variables) must be set for PostgreSQL storage")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

fn build_validator(config: &Config) -> Arc<dyn UrlValidator> {
    if config.validate_dns {
        Arc::new(DnsUrlValidator::new(Duration::from_millis(
            config.dns_timeout_ms,
        )))
    } else {
        tracing::info!("DNS validation disabled");
        Arc::new(SyntaxUrlValidator::new())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
