/// Database models
///
/// # Models
///
/// - `user`: User accounts, keyed by email
/// - `tarefa`: User-owned tasks with optional blob-stored attachments
///
/// Every tarefa query filters on the owner email (the partition key);
/// cross-owner access surfaces as "not found" rather than "forbidden" so the
/// API never leaks record existence.

pub mod tarefa;
pub mod user;
