/// Deadline reminder sweep
///
/// Periodically scans tarefas whose `prazo` falls within the next
/// `window_days` days (today included) and emails the owner one reminder
/// per due tarefa. There is no delivery ledger: a tarefa still inside the
/// window on the next sweep is notified again.
///
/// Per-message failures are logged and do not abort the sweep — the same
/// best-effort posture the API takes with attachment blob deletes.
///
/// # Example
///
/// ```no_run
/// use gestor_worker::mailer::MemoryMailer;
/// use gestor_worker::reminder::{ReminderJob, ReminderSchedule};
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example(pool: PgPool) -> anyhow::Result<()> {
/// let job = ReminderJob::new(pool, Arc::new(MemoryMailer::new()), ReminderSchedule::default());
///
/// // Run the sweep loop until shutdown
/// job.run().await;
/// # Ok(())
/// # }
/// ```

use crate::mailer::{Mailer, ReminderMail};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use gestor_shared::models::tarefa::Tarefa;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// Subject line of every reminder
const REMINDER_SUBJECT: &str = "⏰ Lembrete de tarefa próxima do prazo";

/// Sweep scheduling parameters
#[derive(Debug, Clone)]
pub struct ReminderSchedule {
    /// Seconds between sweeps
    pub interval_seconds: u64,

    /// Days ahead a deadline counts as due soon (today included)
    pub window_days: i64,
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        ReminderSchedule {
            interval_seconds: 60,
            window_days: 2,
        }
    }
}

/// The reminder job
pub struct ReminderJob {
    db: PgPool,
    mailer: Arc<dyn Mailer>,
    schedule: ReminderSchedule,
}

impl ReminderJob {
    /// Creates a reminder job over a pool and a mail port
    pub fn new(db: PgPool, mailer: Arc<dyn Mailer>, schedule: ReminderSchedule) -> Self {
        Self {
            db,
            mailer,
            schedule,
        }
    }

    /// Runs sweeps forever at the configured interval
    pub async fn run(&self) {
        let mut ticker = interval(Duration::from_secs(self.schedule.interval_seconds));

        loop {
            ticker.tick().await;

            let today = Utc::now().date_naive();
            match self.run_once(today).await {
                Ok(sent) => {
                    tracing::info!(
                        "{} lembretes enviados para tarefas com prazo nos próximos {} dias",
                        sent,
                        self.schedule.window_days
                    );
                }
                Err(e) => {
                    tracing::error!("Reminder sweep failed: {}", e);
                }
            }
        }
    }

    /// Runs one sweep for the window starting at `today`
    ///
    /// Returns the number of reminders actually delivered. Send failures
    /// are logged per message and excluded from the count.
    pub async fn run_once(&self, today: NaiveDate) -> anyhow::Result<usize> {
        let until = today + ChronoDuration::days(self.schedule.window_days);
        let due = Tarefa::list_due_between(&self.db, today, until).await?;

        let mut sent = 0;
        for tarefa in &due {
            // Guarded by the query's prazo IS NOT NULL filter
            let Some(prazo) = tarefa.prazo else { continue };
            let dias_restantes = (prazo - today).num_days();

            let mail = build_reminder(&tarefa.email, &tarefa.titulo, dias_restantes);

            match self.mailer.send(mail).await {
                Ok(()) => {
                    tracing::info!("{} avisado", tarefa.email);
                    sent += 1;
                }
                Err(e) => {
                    tracing::warn!("Erro ao enviar para {}: {}", tarefa.email, e);
                }
            }
        }

        Ok(sent)
    }
}

/// Builds the reminder email for one due tarefa
fn build_reminder(email: &str, titulo: &str, dias_restantes: i64) -> ReminderMail {
    ReminderMail {
        to: email.to_string(),
        subject: REMINDER_SUBJECT.to_string(),
        html_body: format!(
            "<strong>A tarefa '{}' termina em {} dia(s).</strong>",
            titulo, dias_restantes
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reminder_names_task_and_days() {
        let mail = build_reminder("a@x.com", "Entregar relatório", 2);

        assert_eq!(mail.to, "a@x.com");
        assert_eq!(mail.subject, REMINDER_SUBJECT);
        assert_eq!(
            mail.html_body,
            "<strong>A tarefa 'Entregar relatório' termina em 2 dia(s).</strong>"
        );
    }

    #[test]
    fn test_build_reminder_due_today() {
        let mail = build_reminder("a@x.com", "T1", 0);
        assert!(mail.html_body.contains("termina em 0 dia(s)"));
    }

    #[test]
    fn test_default_schedule_matches_sweep_contract() {
        let schedule = ReminderSchedule::default();
        assert_eq!(schedule.interval_seconds, 60);
        assert_eq!(schedule.window_days, 2);
    }
}
