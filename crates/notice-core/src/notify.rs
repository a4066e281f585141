//! The diner notification side-channel.
//!
//! Terminals call this after a save that changed status. It is best-effort:
//! callers log failures and never retry or block on them.

use std::{convert::Infallible, future::Future};

use uuid::Uuid;

pub trait NoticeNotifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Tell the diner who owns `order_id` that its status moved.
  fn notify_diner(&self, order_id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// A notifier that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NoticeNotifier for NoopNotifier {
  type Error = Infallible;

  async fn notify_diner(&self, _order_id: Uuid) -> Result<(), Infallible> { Ok(()) }
}
