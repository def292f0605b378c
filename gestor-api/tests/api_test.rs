/// Integration tests for the Gestor de Tarefas API
///
/// These tests exercise the router without a live database: the pool is
/// created lazily and never connected, so only routes whose behavior is
/// independent of the record store run here (session gating, uploads,
/// logout, health degradation). Database-backed behavior is covered by the
/// model unit tests and requires a running PostgreSQL.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use gestor_api::{
    app::{build_router, AppState},
    config::{ApiConfig, BlobBackend, Config, DatabaseConfig, SessionConfig, StorageConfig},
};
use gestor_shared::{
    auth::session::{MemorySessionStore, SessionStore},
    storage::MemoryBlobStore,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower::Service as _;

/// Everything a test needs to drive the router
struct TestContext {
    app: axum::Router,
    sessions: Arc<MemorySessionStore>,
    blobs: Arc<MemoryBlobStore>,
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost:1/gestor_test".to_string(),
            max_connections: 1,
        },
        storage: StorageConfig {
            backend: BlobBackend::Memory,
            bucket: "anexos".to_string(),
            endpoint: None,
            region: None,
            access_key: None,
            secret_key: None,
            public_base_url: None,
            use_path_style: true,
            max_upload_bytes: 1024 * 1024,
        },
        session: SessionConfig {
            ttl_seconds: 3600,
            cookie_name: "sessao".to_string(),
            cookie_secure: false,
        },
    }
}

impl TestContext {
    fn new(ttl: Duration) -> Self {
        let config = test_config();

        // Lazy pool: connections are only attempted when a query runs
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database.url)
            .unwrap();

        let sessions = Arc::new(MemorySessionStore::new(ttl));
        let blobs = Arc::new(MemoryBlobStore::new());

        let state = AppState::new(db, sessions.clone(), blobs.clone(), config);

        Self {
            app: build_router(state),
            sessions,
            blobs,
        }
    }

    /// Logs a synthetic user in, returning the Cookie header value
    async fn session_cookie(&self, email: &str) -> String {
        let token = self.sessions.create(email).await;
        format!("sessao={}", token)
    }
}

/// Builds a multipart body with a single `file` field
fn multipart_file_body(boundary: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

/// Builds a multipart body with a single text field
fn multipart_text_body(boundary: &str, name: &str, value: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_tarefas_require_session() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));

    let request = Request::builder()
        .method("GET")
        .uri("/api/tarefas/listar")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Não autenticado");
}

#[tokio::test]
async fn test_uploads_require_session() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));

    let boundary = "X-GESTOR-BOUNDARY";
    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_file_body(
            boundary,
            "relatorio.pdf",
            b"conteudo",
        )))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_stores_blob_and_returns_url() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));
    let cookie = ctx.session_cookie("ana@example.com").await;

    let boundary = "X-GESTOR-BOUNDARY";
    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_file_body(
            boundary,
            "relatorio.pdf",
            b"conteudo",
        )))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let file_url = json["fileUrl"].as_str().unwrap();

    // The blob name is the last URL segment: timestamp prefix + filename
    let blob = file_url.rsplit('/').next().unwrap();
    assert!(blob.ends_with("-relatorio.pdf"));
    assert!(ctx.blobs.contains(blob));
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));
    let cookie = ctx.session_cookie("ana@example.com").await;

    let boundary = "X-GESTOR-BOUNDARY";
    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_text_body(boundary, "titulo", "T1")))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Nenhum ficheiro enviado.");

    assert!(ctx.blobs.is_empty());
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Logout efetuado com sucesso.");
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));
    let cookie = ctx.session_cookie("ana@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, cookie.clone())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The Set-Cookie header clears the session cookie
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    // The token no longer opens any gate
    let request = Request::builder()
        .method("GET")
        .uri("/api/tarefas/listar")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let mut ctx = TestContext::new(Duration::ZERO);
    let cookie = ctx.session_cookie("ana@example.com").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/tarefas/listar")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_reports_database_state() {
    let mut ctx = TestContext::new(Duration::from_secs(3600));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;

    // No database behind the lazy pool, so health degrades but still answers
    assert_eq!(json["database"], "disconnected");
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
