//! Async HTTP client for the SendGrid mail API.

use std::time::Duration;

use reqwest::Client;
use santa_core::notify::{Message, Notifier, compose};
use serde::Serialize;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.sendgrid.com";

/// Connection settings for SendGrid.
#[derive(Clone)]
pub struct SendGridConfig {
  /// Base URL without a trailing path, e.g. `https://api.sendgrid.com`.
  pub api_url:    String,
  pub api_key:    String,
  /// Verified sender address.
  pub from_email: String,
}

impl std::fmt::Debug for SendGridConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SendGridConfig")
      .field("api_url", &self.api_url)
      .field("api_key", &"<redacted>")
      .field("from_email", &self.from_email)
      .finish()
  }
}

/// Sends assignment notices through SendGrid.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct SendGridNotifier {
  client: Client,
  config: SendGridConfig,
}

// ─── Wire format ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub(crate) struct MailSend<'a> {
  pub personalizations: [Personalization<'a>; 1],
  pub from:             Address<'a>,
  pub subject:          &'a str,
  pub content:          [Content<'a>; 1],
}

#[derive(Serialize)]
pub(crate) struct Personalization<'a> {
  pub to: [Address<'a>; 1],
}

#[derive(Serialize)]
pub(crate) struct Address<'a> {
  pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct Content<'a> {
  #[serde(rename = "type")]
  pub kind:  &'a str,
  pub value: &'a str,
}

impl<'a> MailSend<'a> {
  pub(crate) fn new(from: &'a str, to: &'a str, message: &'a Message) -> Self {
    Self {
      personalizations: [Personalization { to: [Address { email: to }] }],
      from:             Address { email: from },
      subject:          &message.subject,
      content:          [Content { kind: "text/plain", value: &message.body }],
    }
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

impl SendGridNotifier {
  pub fn new(config: SendGridConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/v3/mail/send", self.config.api_url.trim_end_matches('/'))
  }

  /// `POST /v3/mail/send`
  pub async fn deliver(&self, to_address: &str, message: &Message) -> Result<()> {
    let payload = MailSend::new(&self.config.from_email, to_address, message);
    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&payload)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Rejected { status: status.as_u16(), body });
    }

    tracing::debug!(status = status.as_u16(), "sendgrid accepted message");
    Ok(())
  }
}

impl Notifier for SendGridNotifier {
  type Error = Error;

  async fn send(
    &self,
    to_address: &str,
    participant_name: &str,
    assigned_name: &str,
  ) -> Result<()> {
    let message = compose(participant_name, assigned_name);
    self.deliver(to_address, &message).await
  }
}
