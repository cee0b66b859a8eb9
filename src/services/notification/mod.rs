mod log;
mod smtp;
mod templates;

pub use log::LogEmailProvider;
pub use smtp::SmtpEmailProvider;
pub use templates::{render_employee_invite, EmployeeInviteEmail};

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::email::EmailConfig;
use crate::error::{AppError, Result};

/// Email to deliver, with both HTML and plain-text bodies
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Result of sending an email
#[derive(Debug)]
pub struct SendResult {
    pub success: bool,
    pub error: Option<String>,
}

impl SendResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Trait for email delivery backends
#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, message: &EmailMessage) -> SendResult;
}

/// Renders and delivers notification emails
#[derive(Clone)]
pub struct NotificationService {
    provider: Arc<dyn EmailProvider>,
}

impl NotificationService {
    pub fn new(provider: Arc<dyn EmailProvider>) -> Self {
        Self { provider }
    }

    /// Pick SMTP when configured, otherwise log-only delivery
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let provider: Arc<dyn EmailProvider> = match &config.smtp {
            Some(smtp) => {
                let provider = SmtpEmailProvider::from_config(
                    smtp,
                    &config.from_address,
                    &config.from_name,
                )
                .map_err(AppError::Internal)?;
                tracing::info!(host = %smtp.host, "SMTP email provider initialized");
                Arc::new(provider)
            }
            None => {
                tracing::warn!("SMTP not configured, invite emails will only be logged");
                Arc::new(LogEmailProvider)
            }
        };
        Ok(Self::new(provider))
    }

    /// Send the employee invitation email. Delivery failure is an error.
    pub async fn send_employee_invite(&self, invite: &EmployeeInviteEmail) -> Result<()> {
        let message = render_employee_invite(invite);
        let result = self.provider.send(&message).await;

        if result.success {
            tracing::info!(
                provider = self.provider.name(),
                company = %invite.company_name,
                "Employee invite email sent"
            );
            Ok(())
        } else {
            let error = result
                .error
                .unwrap_or_else(|| "unknown delivery error".to_string());
            tracing::error!(provider = self.provider.name(), error = %error, "Failed to send employee invite email");
            Err(AppError::Internal(format!(
                "Failed to send invitation email: {}",
                error
            )))
        }
    }
}
