//! # Gestor de Tarefas API Server
//!
//! HTTP API for a personal task manager:
//! - Registration, login, and logout with session cookies
//! - Task CRUD scoped to the session owner
//! - File attachments stored in an S3-compatible blob store
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p gestor-api
//! ```

use gestor_api::{
    app::{build_router, AppState},
    config::{BlobBackend, Config},
};
use gestor_shared::{
    auth::session::{MemorySessionStore, SessionStore},
    db::{migrations, pool},
    storage::{BlobStore, MemoryBlobStore, S3BlobStore},
};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gestor_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Gestor de Tarefas API v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and schema
    migrations::ensure_database_exists(&config.database.url).await?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // Sessions live in process memory; restarting the server logs everyone out
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(Duration::from_secs(
        config.session.ttl_seconds,
    )));

    // Blob store backend
    let blobs: Arc<dyn BlobStore> = match config.storage.backend {
        BlobBackend::S3 => Arc::new(S3BlobStore::new(&config.storage.s3_config()).await?),
        BlobBackend::Memory => {
            tracing::warn!("Using in-memory blob store; attachments will not survive restarts");
            Arc::new(MemoryBlobStore::new())
        }
    };

    // Build application
    let bind_address = config.bind_address();
    let state = AppState::new(db, sessions, blobs, config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
