/// Tarefa model and database operations
///
/// A tarefa is a user-owned unit of work with free-form metadata and an
/// optional list of attachment URLs (`anexos`). The owner email is the
/// partition key: every query binds it, so one user can never read or write
/// another user's records — a wrong owner simply matches zero rows.
///
/// The `estado` field is opaque to this layer; no transition between values
/// is validated.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tarefas (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL REFERENCES users(email) ON DELETE CASCADE,
///     titulo TEXT NOT NULL,
///     descricao TEXT,
///     prazo DATE,
///     prioridade TEXT,
///     estado TEXT,
///     anexos TEXT[] NOT NULL DEFAULT '{}',
///     data_criacao TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use gestor_shared::models::tarefa::{CreateTarefa, Tarefa};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let tarefa = Tarefa::create(&pool, CreateTarefa {
///     email: "user@example.com".to_string(),
///     titulo: "Entregar relatório".to_string(),
///     descricao: None,
///     prazo: None,
///     prioridade: Some("alta".to_string()),
///     estado: Some("aberta".to_string()),
///     anexos: vec![],
/// }).await?;
///
/// let minhas = Tarefa::list_by_owner(&pool, "user@example.com").await?;
/// assert!(minhas.iter().any(|t| t.id == tarefa.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tarefa record
///
/// JSON field names follow the wire vocabulary of the API (`dataCriacao`);
/// column names are snake_case.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tarefa {
    /// Unique task ID (generated by the store)
    pub id: Uuid,

    /// Task title
    pub titulo: String,

    /// Optional description
    pub descricao: Option<String>,

    /// Optional due date
    pub prazo: Option<NaiveDate>,

    /// Priority label (free-form)
    pub prioridade: Option<String>,

    /// State label (free-form, opaque to this layer)
    pub estado: Option<String>,

    /// Attachment URLs, zero or more
    pub anexos: Vec<String>,

    /// Owner email — the partition key
    pub email: String,

    /// When the tarefa was created (set once)
    #[serde(rename = "dataCriacao")]
    pub data_criacao: DateTime<Utc>,
}

/// Input for creating a new tarefa
#[derive(Debug, Clone)]
pub struct CreateTarefa {
    /// Owner email
    pub email: String,

    /// Task title
    pub titulo: String,

    /// Optional description
    pub descricao: Option<String>,

    /// Optional due date
    pub prazo: Option<NaiveDate>,

    /// Priority label
    pub prioridade: Option<String>,

    /// State label
    pub estado: Option<String>,

    /// Initial attachment URLs (zero or one at creation)
    pub anexos: Vec<String>,
}

/// Partial update of a tarefa's scalar fields
///
/// Fields left as `None` keep their stored value; attachment changes are
/// applied separately by the caller before the record is replaced.
#[derive(Debug, Clone, Default)]
pub struct UpdateTarefa {
    /// New title
    pub titulo: Option<String>,

    /// New description
    pub descricao: Option<String>,

    /// New due date
    pub prazo: Option<NaiveDate>,

    /// New priority label
    pub prioridade: Option<String>,

    /// New state label
    pub estado: Option<String>,
}

impl Tarefa {
    /// Creates a new tarefa
    pub async fn create(pool: &PgPool, data: CreateTarefa) -> Result<Self, sqlx::Error> {
        let tarefa = sqlx::query_as::<_, Tarefa>(
            r#"
            INSERT INTO tarefas (email, titulo, descricao, prazo, prioridade, estado, anexos)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, titulo, descricao, prazo, prioridade, estado, anexos, email, data_criacao
            "#,
        )
        .bind(data.email)
        .bind(data.titulo)
        .bind(data.descricao)
        .bind(data.prazo)
        .bind(data.prioridade)
        .bind(data.estado)
        .bind(data.anexos)
        .fetch_one(pool)
        .await?;

        Ok(tarefa)
    }

    /// Lists all tarefas owned by `email`
    ///
    /// Order is store-native; no ordering is promised to clients.
    pub async fn list_by_owner(pool: &PgPool, email: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tarefas = sqlx::query_as::<_, Tarefa>(
            r#"
            SELECT id, titulo, descricao, prazo, prioridade, estado, anexos, email, data_criacao
            FROM tarefas
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(tarefas)
    }

    /// Lists tarefas whose deadline falls inside `[from, to]`, any owner
    ///
    /// Tarefas without a deadline never match. Used by the reminder sweep,
    /// which is the one read that crosses owner boundaries.
    pub async fn list_due_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tarefas = sqlx::query_as::<_, Tarefa>(
            r#"
            SELECT id, titulo, descricao, prazo, prioridade, estado, anexos, email, data_criacao
            FROM tarefas
            WHERE prazo IS NOT NULL AND prazo >= $1 AND prazo <= $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(tarefas)
    }

    /// Finds a tarefa by id, scoped to its owner
    ///
    /// A cross-owner id matches zero rows and returns `None`.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tarefa = sqlx::query_as::<_, Tarefa>(
            r#"
            SELECT id, titulo, descricao, prazo, prioridade, estado, anexos, email, data_criacao
            FROM tarefas
            WHERE id = $1 AND email = $2
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(tarefa)
    }

    /// Replaces the mutable fields of this tarefa at `(id, email)`
    ///
    /// The caller fetches, merges, and persists the whole record back —
    /// last write wins, no optimistic locking. `id`, `email`, and
    /// `data_criacao` are never overwritten.
    pub async fn replace(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let tarefa = sqlx::query_as::<_, Tarefa>(
            r#"
            UPDATE tarefas
            SET titulo = $3,
                descricao = $4,
                prazo = $5,
                prioridade = $6,
                estado = $7,
                anexos = $8
            WHERE id = $1 AND email = $2
            RETURNING id, titulo, descricao, prazo, prioridade, estado, anexos, email, data_criacao
            "#,
        )
        .bind(self.id)
        .bind(&self.email)
        .bind(&self.titulo)
        .bind(&self.descricao)
        .bind(self.prazo)
        .bind(&self.prioridade)
        .bind(&self.estado)
        .bind(&self.anexos)
        .fetch_optional(pool)
        .await?;

        Ok(tarefa)
    }

    /// Deletes a tarefa by id, scoped to its owner
    ///
    /// Returns whether a record was actually deleted; callers report
    /// success either way (deletion is idempotent).
    pub async fn delete_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tarefas WHERE id = $1 AND email = $2")
            .bind(id)
            .bind(email)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies a partial update in place
    ///
    /// Fields present in `update` overwrite the stored value; absent fields
    /// are left unchanged.
    pub fn merge(&mut self, update: UpdateTarefa) {
        if let Some(titulo) = update.titulo {
            self.titulo = titulo;
        }
        if let Some(descricao) = update.descricao {
            self.descricao = Some(descricao);
        }
        if let Some(prazo) = update.prazo {
            self.prazo = Some(prazo);
        }
        if let Some(prioridade) = update.prioridade {
            self.prioridade = Some(prioridade);
        }
        if let Some(estado) = update.estado {
            self.estado = Some(estado);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tarefa() -> Tarefa {
        Tarefa {
            id: Uuid::new_v4(),
            titulo: "T1".to_string(),
            descricao: Some("desc".to_string()),
            prazo: NaiveDate::from_ymd_opt(2025, 1, 1),
            prioridade: Some("alta".to_string()),
            estado: Some("aberta".to_string()),
            anexos: vec!["http://blobs/anexos/123-a.pdf".to_string()],
            email: "a@x.com".to_string(),
            data_criacao: Utc::now(),
        }
    }

    #[test]
    fn test_merge_partial_update_keeps_absent_fields() {
        let mut tarefa = sample_tarefa();

        tarefa.merge(UpdateTarefa {
            estado: Some("done".to_string()),
            ..Default::default()
        });

        assert_eq!(tarefa.estado.as_deref(), Some("done"));
        assert_eq!(tarefa.titulo, "T1");
        assert_eq!(tarefa.descricao.as_deref(), Some("desc"));
        assert_eq!(tarefa.prazo, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(tarefa.prioridade.as_deref(), Some("alta"));
        assert_eq!(tarefa.anexos.len(), 1);
    }

    #[test]
    fn test_merge_overwrites_all_present_fields() {
        let mut tarefa = sample_tarefa();

        tarefa.merge(UpdateTarefa {
            titulo: Some("T2".to_string()),
            descricao: Some("outra".to_string()),
            prazo: NaiveDate::from_ymd_opt(2026, 2, 2),
            prioridade: Some("baixa".to_string()),
            estado: Some("fechada".to_string()),
        });

        assert_eq!(tarefa.titulo, "T2");
        assert_eq!(tarefa.descricao.as_deref(), Some("outra"));
        assert_eq!(tarefa.prazo, NaiveDate::from_ymd_opt(2026, 2, 2));
        assert_eq!(tarefa.prioridade.as_deref(), Some("baixa"));
        assert_eq!(tarefa.estado.as_deref(), Some("fechada"));
    }

    #[test]
    fn test_json_uses_wire_field_names() {
        let tarefa = sample_tarefa();
        let json = serde_json::to_value(&tarefa).unwrap();

        assert!(json.get("dataCriacao").is_some());
        assert!(json.get("data_criacao").is_none());
        assert_eq!(json["titulo"], "T1");
        assert_eq!(json["anexos"].as_array().unwrap().len(), 1);
    }
}
