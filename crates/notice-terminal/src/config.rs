//! Terminal timing configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_POLL_INTERVAL_MS: u64 = 15_000;
const DEFAULT_REJECTION_DELAY_MS: u64 = 5_000;
const DEFAULT_COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
  /// Full-refresh period for the server and kitchen queues, and for a diner
  /// while it tracks an active notice.
  pub poll_interval_ms:   u64,
  /// How long a server-rejected notice stays in the active queue.
  pub rejection_delay_ms: u64,
  /// Pending operator commands before senders wait.
  pub command_capacity:   usize,
}

impl TerminalConfig {
  pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms.max(1)) }

  pub fn rejection_delay(&self) -> Duration { Duration::from_millis(self.rejection_delay_ms) }
}

impl Default for TerminalConfig {
  fn default() -> Self {
    Self {
      poll_interval_ms:   DEFAULT_POLL_INTERVAL_MS,
      rejection_delay_ms: DEFAULT_REJECTION_DELAY_MS,
      command_capacity:   DEFAULT_COMMAND_CAPACITY,
    }
  }
}
