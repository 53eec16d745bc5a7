//! Mail delivery seam.
//!
//! Actual delivery (SMTP, provider API) is another component's job; the
//! account service only needs a `send` capability to get verification codes
//! out of the process.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// A message handed to the mail collaborator.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub html: bool,
}

/// Mail delivery failure.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mail capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mailer that records the delivery in the log instead of sending it.
///
/// Default wiring for development environments without a mail relay. The
/// message body is not logged; verification codes must not end up in log
/// aggregation.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        info!(to = %message.to, subject = %message.subject, "Mail delivery skipped (log mailer)");
        Ok(())
    }
}
