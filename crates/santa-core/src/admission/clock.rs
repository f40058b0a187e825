//! Time source for the rate limiter.

use std::time::Instant;

/// Monotonic time source.
pub trait Clock: Send + Sync {
  fn now(&self) -> Instant;
}

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant { Instant::now() }
}

#[cfg(test)]
pub use manual::ManualClock;


#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[test]
  fn manual_clock_clones_share_time() {
    let clock = ManualClock::default();
    let handle = clock.clone();
    let start = clock.now();

    handle.advance(Duration::from_secs(30));
    assert_eq!(clock.now(), start + Duration::from_secs(30));
  }

  #[test]
  fn system_clock_is_monotonic() {
    let clock = SystemClock;
    let t1 = clock.now();
    let t2 = clock.now();
    assert!(t2 >= t1);
  }
}
