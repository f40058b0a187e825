//! Error type for `santa-sendgrid`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// SendGrid answered with a non-2xx status.
  #[error("sendgrid rejected the message with status {status}: {body}")]
  Rejected { status: u16, body: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
