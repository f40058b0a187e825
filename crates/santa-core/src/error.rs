//! Error types for `santa-core`.

use std::time::Duration;

use thiserror::Error;

/// A participant list failed validation.
///
/// Every variant describes the caller's own input, so the messages are safe
/// to return verbatim. Indices are zero-based positions in the submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("participants must be a list")]
  MalformedInput,

  #[error("at least 2 participants required")]
  TooFewParticipants,

  #[error("at most {0} participants allowed")]
  TooManyParticipants(usize),

  #[error("participant {0} must be an object with name and email")]
  InvalidParticipant(usize),

  #[error("participant {0} is missing a name")]
  MissingName(usize),

  #[error("participant {0} has an invalid email address")]
  InvalidEmail(usize),

  #[error("participant {0} repeats an email address already in the list")]
  DuplicateEmail(usize),
}

/// The assigner could not produce an assignment set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
  #[error("cannot assign fewer than 2 participants")]
  TooFewParticipants,

  #[error("no valid assignment found after {attempts} attempts")]
  Exhausted { attempts: u32 },
}

/// A request was refused by the admission gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
  #[error("unauthorized")]
  Unauthorized,

  /// `retry_after` is the time until the oldest in-window request expires.
  #[error("rate limited")]
  RateLimited { retry_after: Duration },
}
