//! # Gestor de Tarefas — Shared Library
//!
//! This crate contains the types and infrastructure shared by the Gestor de
//! Tarefas API server: database models, authentication primitives, the
//! session store, and the blob storage port for task attachments.
//!
//! ## Module Organization
//!
//! - `models`: Database models (`user`, `tarefa`) and their CRUD operations
//! - `auth`: Password hashing and the session store
//! - `db`: Connection pool management and migrations
//! - `storage`: Blob store port with S3 and in-memory backends

pub mod auth;
pub mod db;
pub mod models;
pub mod storage;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
