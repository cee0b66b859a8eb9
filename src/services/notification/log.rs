use async_trait::async_trait;

use super::{EmailMessage, EmailProvider, SendResult};

/// Delivery backend for environments without SMTP: records the send in the log
pub struct LogEmailProvider;

#[async_trait]
impl EmailProvider for LogEmailProvider {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> SendResult {
        // The text body carries the invite link; keep it at debug so tokens stay out of info logs
        tracing::info!(to = %message.to, subject = %message.subject, "Email delivery (log only)");
        tracing::debug!(body = %message.text, "Email body");
        SendResult::ok()
    }
}
