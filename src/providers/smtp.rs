//! SMTP mailer backed by Lettre.

use crate::config::SmtpConfig;
use crate::providers::Mailer;
use anyhow::Context as _;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Production mailer sending real email over SMTP.
#[derive(Clone)]
pub struct SmtpMailer {
    server: String,
    port: u16,
    credentials: Credentials,
    from_header: String,
}

impl SmtpMailer {
    /// Build a mailer from the SMTP configuration section.
    #[must_use]
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), config.password.clone()),
            from_header: format!("{} <{}>", config.from_name, config.from_email),
        }
    }

    /// A fresh transport per message avoids stale pooled connections.
    fn build_transport(&self) -> anyhow::Result<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.server)
            .context("SMTP relay setup failed")?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from_header.parse().context("invalid from address")?)
            .to(to.parse().context("invalid recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("failed to build email")?;

        let mailer = self.build_transport()?;

        // Lettre's sync transport blocks on the socket.
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .context("email task failed")?
            .context("failed to send email")?;

        Ok(())
    }
}
