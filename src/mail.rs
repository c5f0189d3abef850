//! Outbound mail helper
//!
//! Thin wrapper over an async SMTP transport. Configuration comes from
//! [`MailConfig`] and is validated when the [`Mailer`] is built. There is
//! no retry, queueing or templating: one call sends one message.
//!
//! # Example
//!
//! ```rust,no_run
//! use sidechat::config::MailConfig;
//! use sidechat::mail::Mailer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MailConfig {
//!         host: "smtp.example.com".to_string(),
//!         port: 587,
//!         username: Some("bot".to_string()),
//!         password: Some("secret".to_string()),
//!         from_address: "bot@example.com".to_string(),
//!         from_name: Some("SideChat".to_string()),
//!         tls: None,
//!     };
//!     let mailer = Mailer::new(&config)?;
//!     let receipt = mailer
//!         .send("someone@example.com", "Hello", "Plain body", Some("<p>HTML body</p>"))
//!         .await?;
//!     println!("{} {}", receipt.code, receipt.message);
//!     Ok(())
//! }
//! ```

use crate::config::{MailConfig, MailTls};
use crate::error::{Result, SideChatError};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::AsyncSmtpTransportBuilder;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

/// Transport-level acknowledgement of a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// SMTP reply code, e.g. "250"
    pub code: String,
    /// Reply text lines joined with newlines
    pub message: String,
}

/// Sends mail through the configured SMTP relay.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Builds a mailer from validated configuration.
    ///
    /// Security follows [`MailConfig::tls_mode`]: port 465 defaults to
    /// implicit TLS, any other port to mandatory STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the relay
    /// parameters cannot be built.
    pub fn new(config: &MailConfig) -> Result<Self> {
        config.validate()?;

        let address: Address = config
            .from_address
            .parse()
            .map_err(|e| SideChatError::Mail(format!("invalid from address: {}", e)))?;
        let from = Mailbox::new(config.from_name.clone(), address);

        let tls = config.tls_mode();
        let builder = transport_builder(&config.host, tls)?.port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        debug!(host = %config.host, port = config.port, ?tls, "Configured SMTP transport");
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Builds a message; with an HTML body it becomes
    /// `multipart/alternative` carrying both bodies.
    ///
    /// # Errors
    ///
    /// Returns `SideChatError::Mail` if the recipient is not a valid
    /// mailbox or the message cannot be assembled.
    pub fn build_message(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> std::result::Result<Message, SideChatError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| SideChatError::Mail(format!("invalid to address: {}", e)))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject);

        let message = match html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                html.to_string(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.to_string()),
        };

        message.map_err(|e| SideChatError::Mail(format!("failed to build message: {}", e)))
    }

    /// Sends one message and returns the relay's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns error on invalid addresses, transport or authentication
    /// failure.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> Result<DeliveryReceipt> {
        let message = self.build_message(to, subject, text, html)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| SideChatError::Mail(format!("SMTP send failed: {}", e)))?;

        let receipt = DeliveryReceipt {
            code: response.code().to_string(),
            message: response.message().collect::<Vec<_>>().join("\n"),
        };
        info!(to = %to, code = %receipt.code, "Mail accepted by relay");
        Ok(receipt)
    }
}

fn transport_builder(
    host: &str,
    tls: MailTls,
) -> std::result::Result<AsyncSmtpTransportBuilder, SideChatError> {
    let relay_error = |e: lettre::transport::smtp::Error| SideChatError::Mail(format!("invalid SMTP relay: {}", e));
    let builder = match tls {
        MailTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host).map_err(relay_error)?,
        MailTls::Starttls => {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).map_err(relay_error)?
        }
        MailTls::Opportunistic => {
            let parameters = TlsParameters::new(host.to_string()).map_err(relay_error)?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .tls(Tls::Opportunistic(parameters))
        }
        MailTls::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
    };
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: Some("bot".to_string()),
            password: Some("secret".to_string()),
            from_address: "bot@example.com".to_string(),
            from_name: Some("SideChat".to_string()),
            tls: None,
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn test_mailer_new_with_valid_config() {
        assert!(Mailer::new(&config()).is_ok());

        let mut smtps = config();
        smtps.port = 465;
        assert!(Mailer::new(&smtps).is_ok());
    }

    #[test]
    fn test_mailer_new_for_local_relays() {
        // Development relays such as MailHog speak plain SMTP on 1025.
        let mut local = config();
        local.host = "localhost".to_string();
        local.port = 1025;
        local.username = None;
        local.password = None;

        local.tls = Some(MailTls::Plain);
        assert!(Mailer::new(&local).is_ok());

        local.tls = Some(MailTls::Opportunistic);
        assert!(Mailer::new(&local).is_ok());
    }

    #[test]
    fn test_mailer_new_rejects_invalid_config() {
        let mut bad = config();
        bad.from_address = String::new();
        assert!(Mailer::new(&bad).is_err());
    }

    #[test]
    fn test_plain_text_message() {
        let mailer = Mailer::new(&config()).unwrap();
        let message = mailer
            .build_message("someone@example.com", "Weekly digest", "Hello", None)
            .unwrap();

        let raw = formatted(&message);
        assert!(raw.contains("Subject: Weekly digest"));
        assert!(raw.contains("To: someone@example.com"));
        assert!(raw.contains("text/plain"));
        assert!(!raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_html_message_is_multipart_alternative() {
        let mailer = Mailer::new(&config()).unwrap();
        let message = mailer
            .build_message(
                "someone@example.com",
                "Weekly digest",
                "Hello",
                Some("<p>Hello</p>"),
            )
            .unwrap();

        let raw = formatted(&message);
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mailer = Mailer::new(&config()).unwrap();
        let result = mailer.build_message("not an address", "Hi", "Hello", None);
        assert!(matches!(result, Err(SideChatError::Mail(_))));
    }
}
