//! SendGrid backend for Secret Santa notifications.
//!
//! Implements [`santa_core::Notifier`] over the SendGrid v3 `mail/send` HTTP
//! API. Each call is one plain-text email to one giver.

mod client;

pub mod error;

pub use client::{DEFAULT_API_URL, SendGridConfig, SendGridNotifier};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
