/// Standalone attachment upload endpoint
///
/// Accepts a multipart form with a `file` field and stores the bytes in the
/// blob store, returning the public URL of the new blob. The blob name is
/// derived from the original filename with a millisecond timestamp prefix,
/// so repeated uploads of the same file never collide.
///
/// # Endpoint
///
/// ```text
/// POST /api/uploads
/// Content-Type: multipart/form-data
/// ```
///
/// # Response
///
/// ```json
/// {
///   "fileUrl": "https://blobs.example.com/anexos/1717000000000-relatorio.pdf"
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use gestor_shared::storage::blob_name;
use serde::{Deserialize, Serialize};

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored blob
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

/// Upload handler
///
/// # Errors
///
/// - `400 Bad Request`: No `file` field in the form
/// - `403 Forbidden`: No live session (rejected by the session gate)
/// - `500 Internal Server Error`: Blob store failure
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Formulário inválido: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("ficheiro").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Formulário inválido: {}", e)))?;

        let name = blob_name(&filename);
        let url = state
            .blobs
            .upload(&name, bytes.to_vec(), content_type.as_deref())
            .await
            .map_err(|e| ApiError::UploadError(e.to_string()))?;

        return Ok((StatusCode::CREATED, Json(UploadResponse { file_url: url })));
    }

    Err(ApiError::BadRequest("Nenhum ficheiro enviado.".to_string()))
}
