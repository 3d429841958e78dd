//! External collaborators behind trait seams.
//!
//! Email delivery and QR rendering are side concerns the workflows depend
//! on but never inspect; each gets a small trait so handlers hold a
//! `dyn` object that tests can swap for a recording mock.

pub mod console;
pub mod mock;
pub mod qr;
pub mod smtp;

use std::sync::Arc;
use tracing::warn;

pub use console::ConsoleMailer;
pub use mock::{MockMailer, MockQrGenerator, SentEmail};
pub use qr::SvgQrGenerator;
pub use smtp::SmtpMailer;

/// Email delivery.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Send one HTML email.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport rejects the message or the
    /// address is invalid; workflow callers treat delivery as best-effort
    /// and only log failures.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// QR code rendering.
pub trait QrGenerator: Send + Sync {
    /// Render a payload as a scannable image packed into a data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded.
    fn data_url(&self, payload: &str) -> anyhow::Result<String>;
}

/// Fire-and-forget email dispatch.
///
/// The send runs as a detached task; a failure is logged and dropped,
/// never propagated to the operation that triggered it.
pub fn send_in_background(mailer: Arc<dyn Mailer>, to: String, subject: String, html_body: String) {
    tokio::spawn(async move {
        if let Err(err) = mailer.send(&to, &subject, &html_body).await {
            warn!(to = %to, subject = %subject, error = %err, "email delivery failed");
        }
    });
}
