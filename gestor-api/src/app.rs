/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use gestor_api::{app::AppState, config::Config};
/// use gestor_shared::{auth::session::MemorySessionStore, storage::MemoryBlobStore};
/// use sqlx::PgPool;
/// use std::{sync::Arc, time::Duration};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(3600)));
/// let blobs = Arc::new(MemoryBlobStore::new());
/// let state = AppState::new(pool, sessions, blobs, config);
/// let app = gestor_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use gestor_shared::{auth::session::SessionStore, storage::BlobStore};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Session store resolving cookie tokens to owners
    pub sessions: Arc<dyn SessionStore>,

    /// Blob store holding task attachments
    pub blobs: Arc<dyn BlobStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        db: PgPool,
        sessions: Arc<dyn SessionStore>,
        blobs: Arc<dyn BlobStore>,
        config: Config,
    ) -> Self {
        Self {
            db,
            sessions,
            blobs,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /api/
///     ├── /auth/                    # Authentication endpoints (public)
///     │   ├── POST /registar
///     │   ├── POST /login
///     │   └── POST /logout
///     ├── /tarefas/                 # Task endpoints (session required)
///     │   ├── POST   /criar
///     │   ├── GET    /listar
///     │   ├── GET    /listar/:id
///     │   ├── PUT    /:id
///     │   └── DELETE /remover/:id
///     └── /uploads                  # Standalone upload (session required)
///         └── POST /
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Body size limit (uploads)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer, credentials enabled for cookies)
/// 4. Session gate (per-route-group basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no session required)
    let auth_routes = Router::new()
        .route("/registar", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    // Task routes (require a live session)
    let tarefa_routes = Router::new()
        .route("/criar", post(routes::tarefas::criar))
        .route("/listar", get(routes::tarefas::listar))
        .route("/listar/:id", get(routes::tarefas::obter))
        .route("/:id", put(routes::tarefas::atualizar))
        .route("/remover/:id", delete(routes::tarefas::remover))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::session::session_gate,
        ));

    // Standalone upload route (requires a live session)
    let upload_routes = Router::new()
        .route("/", post(routes::uploads::upload))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::session::session_gate,
        ));

    // Build complete API
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tarefas", tarefa_routes)
        .nest("/uploads", upload_routes);

    // Configure CORS based on environment. Cookies require credentials, and
    // credentialed responses cannot carry a literal `*` origin, so the
    // wildcard setting mirrors whatever origin the request came from.
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let max_body = state.config.storage.max_upload_bytes;

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
