//! The notifier the binary actually runs with.
//!
//! Either real delivery through SendGrid or a dry run that only logs each
//! composed message.

use std::convert::Infallible;

use santa_core::notify::{Notifier, compose};
use santa_sendgrid::{SendGridConfig, SendGridNotifier};
use thiserror::Error;

use crate::ServerConfig;

#[derive(Debug, Error)]
pub enum MailerError {
  #[error("missing required setting: {0}")]
  MissingSetting(&'static str),

  #[error(transparent)]
  SendGrid(#[from] santa_sendgrid::Error),
}

/// Logs notices instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNotifier;

impl Notifier for DryRunNotifier {
  type Error = Infallible;

  async fn send(
    &self,
    to_address: &str,
    participant_name: &str,
    assigned_name: &str,
  ) -> Result<(), Infallible> {
    let message = compose(participant_name, assigned_name);
    tracing::info!(
      to = to_address,
      subject = %message.subject,
      body = %message.body,
      "dry run: notification not sent"
    );
    Ok(())
  }
}

#[derive(Debug)]
pub enum Mailer {
  SendGrid(SendGridNotifier),
  DryRun(DryRunNotifier),
}

impl Mailer {
  /// SendGrid unless `dry_run` is set. SendGrid needs both `from_email` and
  /// `sendgrid_api_key`.
  pub fn from_config(config: &ServerConfig) -> Result<Self, MailerError> {
    if config.dry_run {
      return Ok(Self::DryRun(DryRunNotifier));
    }

    let from_email = non_empty(&config.from_email)
      .ok_or(MailerError::MissingSetting("from_email"))?;
    let api_key = non_empty(&config.sendgrid_api_key)
      .ok_or(MailerError::MissingSetting("sendgrid_api_key"))?;

    let notifier = SendGridNotifier::new(SendGridConfig {
      api_url:    config.sendgrid_api_url.clone(),
      api_key:    api_key.to_owned(),
      from_email: from_email.to_owned(),
    })?;
    Ok(Self::SendGrid(notifier))
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Notifier for Mailer {
  type Error = MailerError;

  async fn send(
    &self,
    to_address: &str,
    participant_name: &str,
    assigned_name: &str,
  ) -> Result<(), MailerError> {
    match self {
      Self::SendGrid(n) => Ok(n.send(to_address, participant_name, assigned_name).await?),
      Self::DryRun(n) => match n.send(to_address, participant_name, assigned_name).await {
        Ok(()) => Ok(()),
        Err(never) => match never {},
      },
    }
  }
}
