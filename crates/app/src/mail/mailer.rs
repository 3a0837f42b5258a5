//! Mailers

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
};
use mockall::automock;
use tracing::info;

use crate::{domain::games::records::GameId, mail::MailError};

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub subject: String,
    pub html: String,
}

impl Mail {
    /// Notification announcing a freshly created game.
    #[must_use]
    pub fn game_created(id: GameId, title: &str) -> Self {
        Self {
            subject: format!("New game {id}"),
            html: format!("<b>New game:</b> <i>{}</i>", escape(title)),
        }
    }
}

/// Mailer delivering through SMTP.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Mailer relaying through an unauthenticated SMTP server.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Address`] when either address does not parse.
    pub fn new(host: &str, port: u16, from: &str, to: &str) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Ok(Self {
            transport,
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "mail.smtp.send", skip(self, mail), fields(subject = %mail.subject), err)]
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)?;

        self.transport.send(message).await?;

        Ok(())
    }
}

/// Mailer used when delivery is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        info!(subject = %mail.subject, "mail delivery disabled, dropping message");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a notification to the configured recipient.
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
