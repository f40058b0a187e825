//! The admission gate: rate limiting and shared-secret authorization.
//!
//! Both checks must pass before a request reaches the validator. Callers run
//! [`AdmissionGate::throttle`] first and [`AdmissionGate::authorize`] second;
//! the first failure is returned on its own.

pub mod clock;
pub mod rate_limit;
pub mod secret;

pub use clock::{Clock, SystemClock};
pub use rate_limit::{RateLimitPolicy, RateLimiter};
pub use secret::AdminSecret;

use crate::error::AdmissionError;

/// Owns the expected secret and the rate-limit state for one server
/// instance.
pub struct AdmissionGate<C: Clock = SystemClock> {
  secret:  AdminSecret,
  limiter: RateLimiter<C>,
}

impl AdmissionGate<SystemClock> {
  pub fn new(secret: AdminSecret, policy: RateLimitPolicy) -> Self {
    Self::with_limiter(secret, RateLimiter::new(policy))
  }
}

impl<C: Clock> AdmissionGate<C> {
  pub fn with_limiter(secret: AdminSecret, limiter: RateLimiter<C>) -> Self {
    Self { secret, limiter }
  }

  /// Count an attempt from `client` against its window.
  pub fn throttle(&self, client: &str) -> Result<(), AdmissionError> {
    self.limiter.check(client).inspect_err(|_| {
      tracing::warn!(client, "request rate limited");
    })
  }

  /// Compare the caller's token with the configured secret.
  pub fn authorize(&self, token: Option<&str>) -> Result<(), AdmissionError> {
    self.secret.verify(token).inspect_err(|_| {
      tracing::warn!(configured = self.secret.is_configured(), "authorization failed");
    })
  }

  /// Throttle, then authorize.
  pub fn admit(&self, client: &str, token: Option<&str>) -> Result<(), AdmissionError> {
    self.throttle(client)?;
    self.authorize(token)
  }

  pub fn limiter(&self) -> &RateLimiter<C> { &self.limiter }
}
