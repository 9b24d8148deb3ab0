//! Email delivery
//!
//! Delivery is best effort: [`EmailSender::send_report`] logs failures and
//! returns `false` instead of propagating them.

use crate::error::EmailError;
use crate::html::render;
use crate::text::plain_text;
use advisor_config::EmailConfig;
use advisor_core::AnalysisReport;
use async_trait::async_trait;
use chrono::Local;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Something that can put a finished message on the wire
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a single message to its envelope recipients
    async fn deliver(&self, message: Message) -> Result<(), EmailError>;
}

/// SMTP submission with STARTTLS and login credentials
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a transport for `server:port`
    ///
    /// No connection is opened until the first delivery.
    pub fn new(server: &str, port: u16, user: &str, password: &str) -> Result<Self, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();
        Ok(Self { transport })
    }

    /// Build a transport from the SMTP settings
    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        Self::new(
            &config.smtp_server,
            config.smtp_port,
            &config.smtp_user,
            &config.smtp_password,
        )
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, message: Message) -> Result<(), EmailError> {
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Sends rendered reports from a fixed sender address
pub struct EmailSender<T> {
    transport: T,
    from: String,
}

impl<T: MailTransport> EmailSender<T> {
    /// Sender delivering through `transport` as `from`
    ///
    /// The address is parsed on each send, so a malformed one surfaces as a
    /// failed send rather than here.
    pub fn new(transport: T, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mail `report` to every recipient, one message each
    ///
    /// Returns `true` once every recipient has been handed to the transport,
    /// `false` on the first failure.
    pub async fn send_report(&self, report: &AnalysisReport, recipients: &[String]) -> bool {
        match self.try_send(report, recipients).await {
            Ok(()) => {
                tracing::info!(recipients = recipients.len(), "Report emailed");
                true
            }
            Err(e) => {
                tracing::error!("Failed to send email: {}", e);
                false
            }
        }
    }

    async fn try_send(&self, report: &AnalysisReport, recipients: &[String]) -> Result<(), EmailError> {
        let from: Mailbox = self.from.parse()?;
        let to = recipients
            .iter()
            .map(|r| r.trim().parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;

        let subject = subject(report);
        let html = render(report);
        let text = plain_text(report);

        for mailbox in to {
            tracing::debug!(to = %mailbox, "Sending report");
            let message = Message::builder()
                .from(from.clone())
                .to(mailbox)
                .subject(subject.clone())
                .multipart(MultiPart::alternative_plain_html(text.clone(), html.clone()))?;
            self.transport.deliver(message).await?;
        }
        Ok(())
    }
}

impl EmailSender<SmtpMailer> {
    /// SMTP-backed sender for the loaded settings
    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        Ok(Self::new(SmtpMailer::from_config(config)?, &config.email_from))
    }
}

fn subject(report: &AnalysisReport) -> String {
    format!(
        "NPM Update Report - {} - {}",
        report.project,
        Local::now().format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_format() {
        let report = AnalysisReport {
            project: "shop".to_string(),
            ..Default::default()
        };
        let subject = subject(&report);
        let date = subject.strip_prefix("NPM Update Report - shop - ").unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(date.matches('-').count(), 2);
    }

    #[test]
    fn test_smtp_mailer_builds_without_connecting() {
        assert!(SmtpMailer::new("smtp.example.com", 587, "user", "secret").is_ok());
    }
}
