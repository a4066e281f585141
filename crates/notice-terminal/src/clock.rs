//! Wall-clock sources.
//!
//! Rejection expiry compares stored timestamps against "now", so the terminal
//! reads time through [`Clock`] rather than calling [`Utc::now`] directly.

use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub trait Clock: Send + Sync + 'static {
  fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// Wall time derived from the tokio clock, anchored at construction.
///
/// Under a paused runtime this advances exactly as far as `tokio::time`
/// does, keeping timestamps and timers in step.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
  wall:    DateTime<Utc>,
  instant: Instant,
}

impl TokioClock {
  pub fn starting_at(wall: DateTime<Utc>) -> Self {
    Self {
      wall,
      instant: Instant::now(),
    }
  }
}

impl Clock for TokioClock {
  fn now(&self) -> DateTime<Utc> {
    let elapsed = Instant::now().saturating_duration_since(self.instant);
    chrono::Duration::from_std(elapsed)
      .ok()
      .and_then(|d| self.wall.checked_add_signed(d))
      .unwrap_or(DateTime::<Utc>::MAX_UTC)
  }
}
