//! Recording mocks for tests.

use crate::providers::{Mailer, QrGenerator};
use std::sync::{Arc, Mutex};

/// One captured email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Mailer that records every send instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockMailer {
    /// Create a recording mailer that accepts every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mailer whose sends always fail, for exercising the
    /// best-effort contract.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Snapshot of everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("mock mailer configured to fail");
        }
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        }
        Ok(())
    }
}

/// QR generator returning a recognizable stub instead of an image.
#[derive(Debug, Clone, Default)]
pub struct MockQrGenerator;

impl QrGenerator for MockQrGenerator {
    fn data_url(&self, payload: &str) -> anyhow::Result<String> {
        Ok(format!("data:text/plain,{payload}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_mailer_records_sends() {
        let mailer = MockMailer::new();
        mailer.send("a@b.c", "Hi", "<p>hello</p>").await.unwrap();
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.c");
    }

    #[tokio::test]
    async fn failing_mailer_errors_without_recording() {
        let mailer = MockMailer::failing();
        assert!(mailer.send("a@b.c", "Hi", "x").await.is_err());
        assert!(mailer.sent().is_empty());
    }
}
