//! # Gestor de Tarefas Worker
//!
//! Background worker for the Gestor de Tarefas system. Runs the deadline
//! reminder sweep: every minute it finds tarefas whose `prazo` falls within
//! the next two days and emails the owner via Mailjet.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p gestor-worker
//! ```

use gestor_worker::{
    config::WorkerConfig,
    mailer::{Mailer, MailjetMailer},
    reminder::{ReminderJob, ReminderSchedule},
};
use gestor_shared::db::pool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gestor_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Gestor de Tarefas Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = WorkerConfig::from_env()?;

    // Initialize database pool (schema is owned by the API's migrations)
    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database_url.clone(),
        ..Default::default()
    })
    .await?;

    let mailer: Arc<dyn Mailer> = Arc::new(MailjetMailer::new(
        config.mailjet_api_key.clone(),
        config.mailjet_secret_key.clone(),
        config.sender_email.clone(),
        config.sender_name.clone(),
    ));

    let job = ReminderJob::new(
        db,
        mailer,
        ReminderSchedule {
            interval_seconds: config.interval_seconds,
            window_days: config.window_days,
        },
    );

    tracing::info!(
        "Reminder sweep every {}s, window {} days",
        config.interval_seconds,
        config.window_days
    );

    // Sweep until shutdown
    tokio::select! {
        _ = job.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown signal received, exiting...");
        }
    }

    Ok(())
}
