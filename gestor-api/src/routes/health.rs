/// Health endpoint
///
/// `GET /health` answers whether the API process is up and whether it can
/// reach PostgreSQL. It sits outside the session gate so load balancers and
/// compose healthchecks can probe it without credentials. Blob storage is
/// deliberately not probed here: the S3 backend already fails loudly at
/// startup, and a reachable store is not required to serve reads.
///
/// The endpoint always answers 200; a broken database shows up in the body
/// (`"status": "degraded"`), not in the status code.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use gestor_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Body of the health probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when every check passes, "degraded" otherwise
    pub status: String,

    /// Version of the running binary
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,
}

/// Health probe handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_ok = pool::health_check(&state.db).await.is_ok();

    let (status, database) = if database_ok {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
