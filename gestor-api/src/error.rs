/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>` which converts to the status codes of the API's
/// error taxonomy:
///
/// - `BadRequest`, `ValidationError`, `Conflict` → 400 (a duplicate
///   registration is reported as 400 by design, not 409)
/// - `Unauthorized` (bad credentials) → 401
/// - `Forbidden` (no session) → 403
/// - `NotFound` (no matching owned record) → 404
/// - `UploadError`, `InternalError` (downstream failures) → 500
///
/// Downstream detail is logged, never surfaced: 500 bodies carry a generic
/// message only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400)
    BadRequest(String),

    /// Bad credentials (401)
    Unauthorized(String),

    /// No valid session (403)
    Forbidden(String),

    /// No matching owned record (404)
    NotFound(String),

    /// Duplicate registration (400 in this API)
    Conflict(String),

    /// Request body failed validation (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Blob upload failed; carries internal detail for the log (500)
    UploadError(String),

    /// Downstream store failure; carries internal detail for the log (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "forbidden", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::UploadError(msg) => write!(f, "Upload error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            // Duplicate registrations surface as 400 in this API
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Pedido inválido.".to_string(),
                Some(errors),
            ),
            ApiError::UploadError(msg) => {
                tracing::error!("Upload error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upload_error",
                    "Erro ao fazer upload do anexo.".to_string(),
                    None,
                )
            }
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Erro interno do servidor.".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Recurso não encontrado.".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint on users.email means a duplicate registration
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") || constraint.contains("users_pkey") {
                        return ApiError::Conflict("Utilizador já existe.".to_string());
                    }
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<gestor_shared::auth::password::PasswordError> for ApiError {
    fn from(err: gestor_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Forbidden("Não autenticado".to_string());
        assert_eq!(err.to_string(), "Forbidden: Não autenticado");

        let err = ApiError::NotFound("Tarefa não encontrada.".to_string());
        assert_eq!(err.to_string(), "Not found: Tarefa não encontrada.");
    }

    #[test]
    fn test_conflict_maps_to_400() {
        let response = ApiError::Conflict("Utilizador já existe.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response =
            ApiError::InternalError("connection refused at 10.0.0.3".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
