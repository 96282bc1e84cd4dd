//! Outgoing mail
//!
//! A small backend abstraction: SMTP for real delivery, console for
//! development, memory for tests. Send failures are returned to the
//! caller, never swallowed.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::{Arc, Mutex};

use crate::config::{MailBackend, MailConfig};
use crate::error::Result;

/// A message handed to a mail backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Something that can deliver an [`OutgoingEmail`]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingEmail) -> Result<()>;
}

/// Build the configured mail backend
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    match config.backend {
        MailBackend::Smtp => Ok(Arc::new(SmtpMailer::from_config(config)?)),
        MailBackend::Console => Ok(Arc::new(ConsoleMailer {
            from: config.from_address.clone(),
        })),
    }
}

/// Delivers over SMTP with STARTTLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from: Mailbox = config.from_address.parse()?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingEmail) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(mail.to.parse()?)
            .subject(mail.subject)
            .body(mail.body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Logs outgoing mail instead of sending it
pub struct ConsoleMailer {
    from: String,
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: OutgoingEmail) -> Result<()> {
        tracing::info!(
            "mail (console backend) from={} to={} subject={:?}\n{}",
            self.from,
            mail.to,
            mail.subject,
            mail.body
        );
        Ok(())
    }
}

/// Stores mail in memory without sending; for tests
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent through this backend so far
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: OutgoingEmail) -> Result<()> {
        self.sent.lock().expect("mailer lock poisoned").push(mail);
        Ok(())
    }
}
