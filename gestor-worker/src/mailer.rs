/// Mail dispatch port
///
/// Reminders leave the worker through the [`Mailer`] trait. The production
/// implementation talks to the Mailjet v3.1 send API over HTTPS; tests use
/// [`MemoryMailer`], which records messages instead of sending them.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// A reminder email about one tarefa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMail {
    /// Recipient (the tarefa owner)
    pub to: String,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html_body: String,
}

/// Mail dispatch interface
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one reminder email
    async fn send(&self, mail: ReminderMail) -> anyhow::Result<()>;
}

/// Mailer backed by the Mailjet v3.1 send API
pub struct MailjetMailer {
    client: reqwest::Client,
    api_key: String,
    secret_key: String,
    sender_email: String,
    sender_name: String,
}

impl MailjetMailer {
    const SEND_URL: &'static str = "https://api.mailjet.com/v3.1/send";

    /// Creates a mailer with static API credentials and a fixed sender
    pub fn new(
        api_key: String,
        secret_key: String,
        sender_email: String,
        sender_name: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            secret_key,
            sender_email,
            sender_name,
        }
    }
}

#[async_trait]
impl Mailer for MailjetMailer {
    async fn send(&self, mail: ReminderMail) -> anyhow::Result<()> {
        let payload = json!({
            "Messages": [{
                "From": {
                    "Email": self.sender_email,
                    "Name": self.sender_name,
                },
                "To": [{
                    "Email": mail.to,
                    "Name": "Utilizador",
                }],
                "Subject": mail.subject,
                "HTMLPart": mail.html_body,
            }]
        });

        let response = self
            .client
            .post(Self::SEND_URL)
            .basic_auth(&self.api_key, Some(&self.secret_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Mailjet rejected the message: {} - {}", status, body);
        }

        Ok(())
    }
}

/// Mailer that records messages in memory instead of sending them
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<ReminderMail>>,
}

impl MemoryMailer {
    /// Creates an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, in send order
    pub fn sent(&self) -> Vec<ReminderMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of recorded messages
    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: ReminderMail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_mailer_records_in_order() {
        let mailer = MemoryMailer::new();

        for to in ["a@x.com", "b@x.com"] {
            mailer
                .send(ReminderMail {
                    to: to.to_string(),
                    subject: "s".to_string(),
                    html_body: "b".to_string(),
                })
                .await
                .unwrap();
        }

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[1].to, "b@x.com");
    }
}
