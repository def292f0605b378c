//! # Gestor de Tarefas Worker Library
//!
//! Background jobs for the Gestor de Tarefas system. Today that is a single
//! job: the deadline reminder sweep, which periodically finds tarefas due
//! within the next days and emails their owners.
//!
//! ## Modules
//!
//! - `config`: Worker configuration from environment variables
//! - `mailer`: Mail dispatch port with a Mailjet backend
//! - `reminder`: The reminder sweep and its scheduling loop

pub mod config;
pub mod mailer;
pub mod reminder;
