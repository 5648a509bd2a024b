//! Plain-text email through a local SMTP relay.
//!
//! Assumes the environment runs an SMTP server (postfix, sendmail, ...)
//! that accepts unauthenticated mail on `localhost:25`. Every failure,
//! including "no relay listening", is passed up to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use kickshaws::mail::{send_email, Email, MailConfig};
//!
//! let email = Email::new("me@example.com", "you@example.com, them@example.com", "Report", "Done.");
//! send_email(&MailConfig::default(), &email)?;
//! ```

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};
use serde::Deserialize;

use crate::error::{KickshawsError, Result};

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Relay host name.
    pub smtp_host: String,
    /// Relay port.
    pub smtp_port: u16,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
        }
    }
}

/// One or more recipient addresses.
///
/// Built from a single string (several addresses may be separated by commas)
/// or from a list of addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// The individual addresses, trimmed, in the order given.
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.0
    }

    fn from_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            parts
                .into_iter()
                .flat_map(|part| part.split(','))
                .map(str::trim)
                .filter(|addr| !addr.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<&str> for Recipients {
    fn from(addresses: &str) -> Self {
        Self::from_parts([addresses])
    }
}

impl From<String> for Recipients {
    fn from(addresses: String) -> Self {
        Self::from(addresses.as_str())
    }
}

impl From<&[&str]> for Recipients {
    fn from(addresses: &[&str]) -> Self {
        Self::from_parts(addresses.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Self::from_parts(addresses)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self::from_parts(addresses.iter().map(String::as_str))
    }
}

/// A plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: Recipients,
    pub subject: String,
    pub body: String,
}

impl Email {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<Recipients>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Assembles the MIME message without sending it.
///
/// Fails with [`KickshawsError::InvalidArgument`] when there are no
/// recipients and with [`KickshawsError::Address`] when an address does
/// not parse.
pub fn build_message(email: &Email) -> Result<Message> {
    if email.to.addresses().is_empty() {
        return Err(KickshawsError::InvalidArgument(
            "email needs at least one recipient".to_string(),
        ));
    }

    let mut builder = Message::builder()
        .from(email.from.parse::<Mailbox>()?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    for address in email.to.addresses() {
        builder = builder.to(address.parse::<Mailbox>()?);
    }
    Ok(builder.body(email.body.clone())?)
}

/// Sends `email` through the relay described by `config`.
pub fn send_email(config: &MailConfig, email: &Email) -> Result<()> {
    let message = build_message(email)?;
    let transport = SmtpTransport::builder_dangerous(config.smtp_host.as_str())
        .port(config.smtp_port)
        .build();

    transport.send(&message)?;
    tracing::info!(
        "Sent '{}' to {} recipient(s) via {}:{}",
        email.subject,
        email.to.addresses().len(),
        config.smtp_host,
        config.smtp_port
    );
    Ok(())
}
