//! Sliding-window rate limiting keyed by client identifier.
//!
//! Each identifier keeps the timestamps of its admitted requests inside the
//! trailing window. Timestamps are pruned lazily on every check for that
//! identifier. Entries live in a [`DashMap`], so checks for different
//! identifiers only contend when they hash to the same shard, and checks for
//! the same identifier serialise on that shard's lock.

use std::{
  collections::VecDeque,
  time::{Duration, Instant},
};

use dashmap::DashMap;

use super::clock::{Clock, SystemClock};
use crate::error::AdmissionError;

/// Window length and per-window ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
  pub window:       Duration,
  pub max_requests: usize,
}

impl Default for RateLimitPolicy {
  fn default() -> Self {
    Self {
      window:       Duration::from_secs(60),
      max_requests: 5,
    }
  }
}

/// Per-identifier request history.
pub struct RateLimiter<C: Clock = SystemClock> {
  policy:  RateLimitPolicy,
  clock:   C,
  history: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter<SystemClock> {
  pub fn new(policy: RateLimitPolicy) -> Self { Self::with_clock(policy, SystemClock) }
}

impl<C: Clock> RateLimiter<C> {
  pub fn with_clock(policy: RateLimitPolicy, clock: C) -> Self {
    Self { policy, clock, history: DashMap::new() }
  }

  pub fn policy(&self) -> RateLimitPolicy { self.policy }

  /// Admit `client` and record the attempt, or refuse without recording.
  pub fn check(&self, client: &str) -> Result<(), AdmissionError> {
    let now = self.clock.now();
    let window = self.policy.window;

    let mut stamps = self.history.entry(client.to_owned()).or_default();
    while stamps
      .front()
      .is_some_and(|t| now.saturating_duration_since(*t) >= window)
    {
      stamps.pop_front();
    }

    if stamps.len() >= self.policy.max_requests {
      let retry_after = stamps
        .front()
        .map(|oldest| window.saturating_sub(now.saturating_duration_since(*oldest)))
        .unwrap_or(window);
      return Err(AdmissionError::RateLimited { retry_after });
    }

    stamps.push_back(now);
    Ok(())
  }

  /// Drop identifiers whose entire history has left the window.
  ///
  /// Returns the number of identifiers removed.
  pub fn purge_idle(&self) -> usize {
    let now = self.clock.now();
    let window = self.policy.window;
    let before = self.history.len();
    self.history.retain(|_, stamps| {
      stamps
        .back()
        .is_some_and(|t| now.saturating_duration_since(*t) < window)
    });
    before.saturating_sub(self.history.len())
  }

  /// Number of identifiers currently tracked.
  pub fn tracked(&self) -> usize { self.history.len() }
}
