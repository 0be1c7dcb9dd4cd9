//! Account notification delivery
//!
//! [`SmtpNotifier`] sends plain-text mail through a pooled `lettre` SMTP
//! transport. The transport is blocking, so each send runs on the blocking
//! thread pool. [`LogNotifier`] is used when mail is disabled and only logs
//! the link that would have been sent.

use crate::config::MailSettings;
use async_trait::async_trait;
use cadence_core::{CadenceError, Notifier, Result, TokenPolicy};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

/// Subject and body of an outgoing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub body: String,
}

/// Builds notification text and links for one deployment
///
/// The expiry stated in each mail comes from the same [`TokenPolicy`] the
/// credential manager enforces.
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    app_name: String,
    frontend_url: String,
    policy: TokenPolicy,
}

/// "1 hour", "90 minutes", "24 hours"
fn describe_lifetime(ttl: chrono::Duration) -> String {
    let minutes = ttl.num_minutes();
    let (amount, unit) = if minutes >= 60 && minutes % 60 == 0 {
        (minutes / 60, "hour")
    } else {
        (minutes, "minute")
    };
    if amount == 1 {
        format!("1 {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

impl EmailTemplates {
    pub fn new(app_name: impl Into<String>, frontend_url: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
            policy: TokenPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn verify_link(&self, token: &str) -> String {
        format!("{}/auth/verify?token={}", self.frontend_url, token)
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/auth/reset-password?token={}", self.frontend_url, token)
    }

    pub fn verification(&self, token: &str) -> Email {
        Email {
            subject: format!("Verify your {} account", self.app_name),
            body: format!(
                "Please click the following link to verify your account:\n{}\n\n\
                 This link will expire in {}.\n\n\
                 If you did not create an account, you can ignore this email.",
                self.verify_link(token),
                describe_lifetime(self.policy.verify_token_ttl)
            ),
        }
    }

    pub fn password_reset(&self, token: &str) -> Email {
        Email {
            subject: format!("Reset your {} password", self.app_name),
            body: format!(
                "Please click the following link to reset your password:\n{}\n\n\
                 This link will expire in {}.\n\n\
                 If you did not request a password reset, you can ignore this email.",
                self.reset_link(token),
                describe_lifetime(self.policy.reset_token_ttl)
            ),
        }
    }
}

pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
    templates: EmailTemplates,
}

impl SmtpNotifier {
    pub fn new(settings: &MailSettings, templates: EmailTemplates) -> Result<Self> {
        let relay = if settings.starttls {
            SmtpTransport::starttls_relay(&settings.smtp_host)
        } else {
            SmtpTransport::relay(&settings.smtp_host)
        };
        let builder = relay.map_err(|e| CadenceError::notification(format!("Failed to create SMTP transport: {e}")))?;

        let mut builder = builder
            .port(settings.smtp_port)
            .pool_config(PoolConfig::new().max_size(4))
            .timeout(Some(Duration::from_secs(10)));

        if let (Some(username), Some(password)) = (&settings.smtp_username, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", settings.app_name, settings.from_address)
            .parse()
            .map_err(|e| CadenceError::notification(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
            templates,
        })
    }

    async fn send(&self, to: &str, email: Email) -> Result<()> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| CadenceError::notification(format!("Invalid to address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| CadenceError::notification(format!("Failed to create email: {e}")))?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| CadenceError::internal(format!("Mail task failed: {e}")))?
            .map_err(|e| CadenceError::notification(format!("Failed to send email: {e}")))?;

        tracing::info!("Email sent to {}", to);
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_verification(&self, email: &str, token: &str) -> Result<()> {
        self.send(email, self.templates.verification(token)).await
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> Result<()> {
        self.send(email, self.templates.password_reset(token)).await
    }
}

/// Notifier for deployments without SMTP
pub struct LogNotifier {
    templates: EmailTemplates,
}

impl LogNotifier {
    pub fn new(templates: EmailTemplates) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_verification(&self, email: &str, token: &str) -> Result<()> {
        tracing::info!(
            "Mail disabled; verification link for {}: {}",
            email,
            self.templates.verify_link(token)
        );
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> Result<()> {
        tracing::info!(
            "Mail disabled; password reset link for {}: {}",
            email,
            self.templates.reset_link(token)
        );
        Ok(())
    }
}
