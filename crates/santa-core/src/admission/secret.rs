//! Shared-secret authorization.
//!
//! Both the configured secret and the candidate are reduced to SHA-256
//! digests and compared with `subtle`, so neither the position of the first
//! differing byte nor the candidate's length shows up in timing.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::AdmissionError;

/// The expected admin key. Never printed.
#[derive(Clone)]
pub struct AdminSecret {
  digest: Option<[u8; 32]>,
}

impl std::fmt::Debug for AdminSecret {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AdminSecret")
      .field("configured", &self.is_configured())
      .finish()
  }
}

impl AdminSecret {
  /// `None` or an empty string leaves the secret unconfigured, which rejects
  /// every candidate.
  pub fn new(expected: Option<&str>) -> Self {
    let digest = expected.filter(|s| !s.is_empty()).map(sha256);
    Self { digest }
  }

  pub fn is_configured(&self) -> bool { self.digest.is_some() }

  /// Check a caller-supplied token.
  pub fn verify(&self, candidate: Option<&str>) -> Result<(), AdmissionError> {
    let candidate = candidate.unwrap_or_default();
    let supplied = sha256(candidate);

    let Some(expected) = &self.digest else {
      return Err(AdmissionError::Unauthorized);
    };

    let matches: bool = expected[..].ct_eq(&supplied[..]).into();
    if matches && !candidate.is_empty() {
      Ok(())
    } else {
      Err(AdmissionError::Unauthorized)
    }
  }
}

fn sha256(input: &str) -> [u8; 32] {
  let mut out = [0u8; 32];
  out.copy_from_slice(&Sha256::digest(input.as_bytes()));
  out
}
