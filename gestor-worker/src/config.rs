/// Worker configuration
///
/// Loads configuration from environment variables into a typed struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `MAILJET_API_KEY`: Mailjet API key (required)
/// - `MAILJET_SECRET_KEY`: Mailjet secret key (required)
/// - `MAIL_SENDER`: Sender address on outgoing reminders (required)
/// - `MAIL_SENDER_NAME`: Sender display name (default: "Gestor de Tarefas")
/// - `REMINDER_INTERVAL_SECONDS`: Seconds between sweeps (default: 60)
/// - `REMINDER_WINDOW_DAYS`: How many days ahead a deadline counts as "due
///   soon", today included (default: 2)

use std::env;

/// Complete worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Mailjet API key
    pub mailjet_api_key: String,

    /// Mailjet secret key
    pub mailjet_secret_key: String,

    /// Sender address on outgoing reminders
    pub sender_email: String,

    /// Sender display name
    pub sender_name: String,

    /// Seconds between reminder sweeps
    pub interval_seconds: u64,

    /// Days ahead a deadline counts as due soon (today included)
    pub window_days: i64,
}

impl WorkerConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or values fail to
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let mailjet_api_key = env::var("MAILJET_API_KEY")
            .map_err(|_| anyhow::anyhow!("MAILJET_API_KEY environment variable is required"))?;
        let mailjet_secret_key = env::var("MAILJET_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("MAILJET_SECRET_KEY environment variable is required"))?;
        let sender_email = env::var("MAIL_SENDER")
            .map_err(|_| anyhow::anyhow!("MAIL_SENDER environment variable is required"))?;
        let sender_name =
            env::var("MAIL_SENDER_NAME").unwrap_or_else(|_| "Gestor de Tarefas".to_string());

        let interval_seconds = env::var("REMINDER_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()?;
        let window_days = env::var("REMINDER_WINDOW_DAYS")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<i64>()?;

        Ok(Self {
            database_url,
            mailjet_api_key,
            mailjet_secret_key,
            sender_email,
            sender_name,
            interval_seconds,
            window_days,
        })
    }
}
