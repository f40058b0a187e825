//! The outbound notification seam.
//!
//! The core never talks to a mail provider directly. The request handler
//! calls a [`Notifier`] once per assignment; every implementation renders the
//! same text via [`compose`].

use std::future::Future;

/// Subject line shared by every assignment notice.
pub const SUBJECT: &str = "🎄 Your Secret Santa Assignment";

/// A rendered notice, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub subject: String,
  pub body:    String,
}

/// Render the notice telling `participant_name` who they are buying for.
pub fn compose(participant_name: &str, assigned_name: &str) -> Message {
  Message {
    subject: SUBJECT.to_owned(),
    body:    format!(
      "Hi {participant_name},\n\n\
       🎁 You are the Secret Santa for: {assigned_name}\n\n\
       Keep it a secret 🤫\n\
       Happy gifting!\n"
    ),
  }
}

/// Delivers one private assignment notice.
///
/// Delivery is best-effort; the only contract is that a failure is reported
/// rather than swallowed.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Tell the giver at `to_address` that they are buying for
  /// `assigned_name`.
  fn send<'a>(
    &'a self,
    to_address: &'a str,
    participant_name: &'a str,
    assigned_name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
