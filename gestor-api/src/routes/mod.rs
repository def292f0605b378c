/// API route handlers
///
/// This module contains all HTTP route handlers:
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout
/// - `tarefas`: Task CRUD with attachment handling
/// - `uploads`: Standalone attachment upload

pub mod auth;
pub mod health;
pub mod tarefas;
pub mod uploads;
