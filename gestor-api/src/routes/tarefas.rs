/// Task endpoints
///
/// CRUD over task records, scoped to the session owner. Create and update
/// accept multipart forms so a file attachment can ride along with the
/// fields; the attachment lands in the blob store and its URL is recorded
/// on the task.
///
/// # Endpoints
///
/// - `POST /api/tarefas/criar` - Create a task (optional attachment)
/// - `GET /api/tarefas/listar` - List the owner's tasks
/// - `GET /api/tarefas/listar/:id` - Fetch one task
/// - `PUT /api/tarefas/:id` - Update fields, add/remove attachments
/// - `DELETE /api/tarefas/remover/:id` - Remove a task and its attachments
///
/// Every lookup filters by owner as well as id: another user's task id
/// behaves exactly like a nonexistent one.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    middleware::session::CurrentUser,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use gestor_shared::{
    models::tarefa::{CreateTarefa, Tarefa, UpdateTarefa},
    storage::{blob_name, blob_name_from_url},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response carrying a message and the affected task
#[derive(Debug, Serialize, Deserialize)]
pub struct TarefaResponse {
    /// Human-readable outcome message
    pub message: String,

    /// The task after the operation
    pub tarefa: Tarefa,
}

/// Message-only response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome message
    pub message: String,
}

/// File carried in a multipart form
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Parsed multipart task form
///
/// Both create and update use the same field names; fields absent from the
/// form stay `None` so updates can merge partially.
#[derive(Default)]
struct TarefaForm {
    titulo: Option<String>,
    descricao: Option<String>,
    prazo: Option<String>,
    prioridade: Option<String>,
    estado: Option<String>,
    remover_anexos: Vec<String>,
    file: Option<UploadedFile>,
}

impl TarefaForm {
    /// Drains a multipart stream into a form
    async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = TarefaForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Formulário inválido: {}", e)))?
        {
            let Some(name) = field.name().map(|n| n.to_string()) else {
                continue;
            };

            match name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or("ficheiro").to_string();
                    let content_type = field.content_type().map(|ct| ct.to_string());
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::BadRequest(format!("Formulário inválido: {}", e))
                    })?;

                    form.file = Some(UploadedFile {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                "removerAnexos" | "removerAnexos[]" => {
                    let value = field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Formulário inválido: {}", e))
                    })?;
                    if !value.is_empty() {
                        form.remover_anexos.push(value);
                    }
                }
                other => {
                    let value = field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Formulário inválido: {}", e))
                    })?;

                    match other {
                        "titulo" => form.titulo = Some(value),
                        "descricao" => form.descricao = Some(value),
                        "prazo" => form.prazo = Some(value),
                        "prioridade" => form.prioridade = Some(value),
                        "estado" => form.estado = Some(value),
                        _ => {}
                    }
                }
            }
        }

        Ok(form)
    }

    /// Parses the deadline field, treating an empty string as absent
    fn parsed_prazo(&self) -> ApiResult<Option<NaiveDate>> {
        match self.prazo.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| ApiError::BadRequest("Data de prazo inválida.".to_string())),
        }
    }
}

/// Uploads a form file to the blob store, returning the blob URL
async fn upload_attachment(state: &AppState, file: &UploadedFile) -> ApiResult<String> {
    let name = blob_name(&file.filename);
    state
        .blobs
        .upload(&name, file.bytes.clone(), file.content_type.as_deref())
        .await
        .map_err(|e| ApiError::UploadError(e.to_string()))
}

/// Deletes the blob behind an attachment URL, logging failures
///
/// Blob deletion is best-effort: a store outage must not block record
/// operations, so failures are logged and swallowed.
async fn delete_attachment_blob(state: &AppState, url: &str) {
    let Some(name) = blob_name_from_url(url) else {
        return;
    };

    if let Err(e) = state.blobs.delete(name).await {
        tracing::warn!("Failed to delete attachment blob {}: {}", name, e);
    }
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tarefas/criar
/// Content-Type: multipart/form-data
/// ```
///
/// Fields: `titulo` (required), `descricao`, `prazo` (YYYY-MM-DD),
/// `prioridade`, `estado`, `file` (optional attachment).
///
/// # Errors
///
/// - `400 Bad Request`: Missing title or malformed deadline
/// - `403 Forbidden`: No live session
/// - `500 Internal Server Error`: Blob or database failure
pub async fn criar(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = TarefaForm::from_multipart(multipart).await?;

    let titulo = match form.titulo.as_deref() {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "titulo".to_string(),
                message: "O título é obrigatório.".to_string(),
            }]))
        }
    };

    let prazo = form.parsed_prazo()?;

    // The blob goes up before the record exists; if the insert then fails
    // the upload is compensated so no orphan blob survives.
    let mut anexos = Vec::new();
    if let Some(file) = &form.file {
        anexos.push(upload_attachment(&state, file).await?);
    }

    let created = Tarefa::create(
        &state.db,
        CreateTarefa {
            titulo,
            descricao: form.descricao.clone(),
            prazo,
            prioridade: form.prioridade.clone(),
            estado: form.estado.clone(),
            anexos: anexos.clone(),
            email: current_user.email.clone(),
        },
    )
    .await;

    let tarefa = match created {
        Ok(tarefa) => tarefa,
        Err(e) => {
            for url in &anexos {
                delete_attachment_blob(&state, url).await;
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(tarefa)))
}

/// List the owner's tasks
///
/// # Endpoint
///
/// ```text
/// GET /api/tarefas/listar
/// ```
///
/// Returns the session owner's tasks. An owner with no tasks gets an empty
/// list.
pub async fn listar(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Tarefa>>> {
    let tarefas = Tarefa::list_by_owner(&state.db, &current_user.email).await?;
    Ok(Json(tarefas))
}

/// Fetch one task by id
///
/// # Endpoint
///
/// ```text
/// GET /api/tarefas/listar/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No task with this id belongs to the session owner
///   (malformed ids and other users' ids look the same)
pub async fn obter(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Tarefa>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::NotFound("Tarefa não encontrada.".to_string()))?;

    let tarefa = Tarefa::find_by_id_and_owner(&state.db, id, &current_user.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tarefa não encontrada.".to_string()))?;

    Ok(Json(tarefa))
}

/// Update a task
///
/// # Endpoint
///
/// ```text
/// PUT /api/tarefas/:id
/// Content-Type: multipart/form-data
/// ```
///
/// Fields present in the form replace the stored values; absent fields are
/// kept. `removerAnexos` entries name attachment URLs to drop, and `file`
/// adds a new attachment. Removal URLs not actually attached to this task
/// are ignored, so a caller cannot delete blobs through a task it owns.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed deadline
/// - `403 Forbidden`: No live session
/// - `404 Not Found`: No matching owned task
/// - `500 Internal Server Error`: Blob or database failure
pub async fn atualizar(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<TarefaResponse>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::NotFound("Tarefa não encontrada.".to_string()))?;

    let form = TarefaForm::from_multipart(multipart).await?;
    let prazo = form.parsed_prazo()?;

    let mut tarefa = Tarefa::find_by_id_and_owner(&state.db, id, &current_user.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tarefa não encontrada.".to_string()))?;

    // Drop requested attachments, but only ones this task actually holds.
    if !form.remover_anexos.is_empty() {
        let mut kept = Vec::with_capacity(tarefa.anexos.len());
        for url in std::mem::take(&mut tarefa.anexos) {
            if form.remover_anexos.contains(&url) {
                delete_attachment_blob(&state, &url).await;
            } else {
                kept.push(url);
            }
        }
        tarefa.anexos = kept;
    }

    if let Some(file) = &form.file {
        let url = upload_attachment(&state, file).await?;
        tarefa.anexos.push(url);
    }

    tarefa.merge(UpdateTarefa {
        titulo: form.titulo,
        descricao: form.descricao,
        prazo,
        prioridade: form.prioridade,
        estado: form.estado,
    });

    let updated = tarefa
        .replace(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tarefa não encontrada.".to_string()))?;

    Ok(Json(TarefaResponse {
        message: "Tarefa atualizada com sucesso.".to_string(),
        tarefa: updated,
    }))
}

/// Remove a task
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tarefas/remover/:id
/// ```
///
/// Removal is idempotent: deleting an id that does not resolve to an owned
/// task still reports success. When the task exists its attachment blobs
/// are deleted best-effort before the record goes.
pub async fn remover(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = MessageResponse {
        message: "Tarefa removida com sucesso.".to_string(),
    };

    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(Json(removed));
    };

    let tarefa = Tarefa::find_by_id_and_owner(&state.db, id, &current_user.email).await?;

    if let Some(tarefa) = tarefa {
        for url in &tarefa.anexos {
            delete_attachment_blob(&state, url).await;
        }

        Tarefa::delete_by_id_and_owner(&state.db, id, &current_user.email).await?;
    }

    Ok(Json(removed))
}
