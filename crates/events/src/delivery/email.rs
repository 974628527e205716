//! Email notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text notification emails. If `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "mkt_biz@cnec.co.kr";

const DEFAULT_FROM_NAME: &str = "cnec";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Bare sender address.
    pub from_address: String,
    /// Display name shown next to the sender address.
    pub from_name: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable         | Required | Default              |
    /// |------------------|----------|----------------------|
    /// | `SMTP_HOST`      | yes      |                      |
    /// | `SMTP_PORT`      | no       | `587`                |
    /// | `SMTP_FROM`      | no       | `mkt_biz@cnec.co.kr` |
    /// | `SMTP_FROM_NAME` | no       | `cnec`               |
    /// | `SMTP_USER`      | no       |                      |
    /// | `SMTP_PASSWORD`  | no       |                      |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let smtp_host = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            from_name: lookup("SMTP_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailSender
// ---------------------------------------------------------------------------

/// Something that can deliver a plain-text email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<lettre::Message, EmailError> {
        use lettre::message::{header::ContentType, Mailbox};

        let from = Mailbox::new(
            Some(self.config.from_name.clone()),
            self.config.from_address.parse()?,
        );

        lettre::Message::builder()
            .from(from)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for EmailDelivery {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        use lettre::{
            transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
            Tokio1Executor,
        };

        let email = self.build_message(to, subject, body)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to, subject, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config() -> EmailConfig {
        EmailConfig::from_lookup(|name| match name {
            "SMTP_HOST" => Some("smtp.gmail.com".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn from_lookup_returns_none_without_smtp_host() {
        assert!(EmailConfig::from_lookup(|_| None).is_none());
        assert!(EmailConfig::from_lookup(|n| (n == "SMTP_HOST").then(|| " ".to_string())).is_none());
    }

    #[test]
    fn from_lookup_fills_defaults() {
        let config = config();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.from_address, "mkt_biz@cnec.co.kr");
        assert_eq!(config.from_name, "cnec");
        assert!(config.smtp_user.is_none());
    }

    #[test]
    fn build_message_rejects_bad_recipient() {
        let delivery = EmailDelivery::new(config());
        assert_matches!(
            delivery.build_message("not-an-email", "s", "b"),
            Err(EmailError::Address(_))
        );
    }

    #[test]
    fn build_message_sets_named_sender() {
        let delivery = EmailDelivery::new(config());
        let message = delivery
            .build_message("ceo@brand.co.kr", "[CNEC] 캠페인 승인", "본문")
            .unwrap();
        let from = message.headers().get_raw("From").unwrap();
        assert!(from.contains("mkt_biz@cnec.co.kr"));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
