//! Console mailer for development.

use crate::providers::Mailer;
use tracing::info;

/// Logs emails instead of sending them. Used whenever no SMTP section is
/// configured.
#[derive(Clone, Debug, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// Create a new console mailer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        info!(to = %to, subject = %subject, body_len = html_body.len(), "email (console mode)");
        Ok(())
    }
}
