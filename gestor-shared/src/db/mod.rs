/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Migration runner (sqlx migrations under `migrations/`)
///
/// Models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
