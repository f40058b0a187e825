//! Participants and the validator that turns raw request input into a
//! [`ParticipantList`].
//!
//! Identity is the normalised email address: trimmed and lower-cased. Two
//! entries with the same name but different emails are distinct people.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::ValidationError;

/// Upper bound on list length; bounds notification fan-out per request.
pub const MAX_PARTICIPANTS: usize = 200;

// ─── Types ───────────────────────────────────────────────────────────────────

/// A single person taking part in the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
  /// Display name, trimmed and non-empty.
  pub name:  String,
  /// Trimmed, lower-cased address.
  pub email: String,
}

/// An ordered list of at least two participants with pairwise-distinct
/// emails.
///
/// Only [`validate`] constructs one, so holding a `ParticipantList` is proof
/// that the invariants hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantList(Vec<Participant>);

impl ParticipantList {
  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn as_slice(&self) -> &[Participant] { &self.0 }

  pub fn iter(&self) -> std::slice::Iter<'_, Participant> { self.0.iter() }
}

impl<'a> IntoIterator for &'a ParticipantList {
  type Item = &'a Participant;
  type IntoIter = std::slice::Iter<'a, Participant>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Validate raw `participants` input from a request body.
///
/// Checks run element by element in list order, so the error reported is
/// always the one at the lowest index. On success names are trimmed and
/// emails normalised; nothing else is changed.
pub fn validate(raw: &Value) -> Result<ParticipantList, ValidationError> {
  let entries = raw.as_array().ok_or(ValidationError::MalformedInput)?;

  if entries.len() < 2 {
    return Err(ValidationError::TooFewParticipants);
  }
  if entries.len() > MAX_PARTICIPANTS {
    return Err(ValidationError::TooManyParticipants(MAX_PARTICIPANTS));
  }

  let mut seen = HashSet::with_capacity(entries.len());
  let mut participants = Vec::with_capacity(entries.len());

  for (index, entry) in entries.iter().enumerate() {
    let record = entry
      .as_object()
      .ok_or(ValidationError::InvalidParticipant(index))?;

    let name = record
      .get("name")
      .and_then(Value::as_str)
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .ok_or(ValidationError::MissingName(index))?;

    let email = record
      .get("email")
      .and_then(Value::as_str)
      .map(normalize_email)
      .filter(|e| is_valid_email(e))
      .ok_or(ValidationError::InvalidEmail(index))?;

    if !seen.insert(email.clone()) {
      return Err(ValidationError::DuplicateEmail(index));
    }

    participants.push(Participant { name: name.to_owned(), email });
  }

  Ok(ParticipantList(participants))
}

/// Trim and lower-case an address.
pub fn normalize_email(raw: &str) -> String { raw.trim().to_lowercase() }

/// Basic `local-part@domain.tld` shape check on a normalised address.
///
/// Exactly one `@`, no whitespace, a non-empty local part, and a domain with
/// at least one `.` that has text on both sides.
pub fn is_valid_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
    None => false,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
