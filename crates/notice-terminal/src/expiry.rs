//! Auto-expiry of server-rejected notices from the server's active queue.
//!
//! A rejected notice stays visible for the rejection delay, measured from
//! `rejected_at`, then drops out of the queue. Leaving the rejected status or
//! disappearing from the store brings it back (or forgets it).

use std::{
  collections::{HashMap, HashSet},
  time::Duration,
};

use chrono::{DateTime, Utc};
use notice_core::{order::Order, status::OrderStatus};
use uuid::Uuid;

/// What the caller must do with the order's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
  Keep,
  /// Start (or restart) the deferred hide with this delay.
  Schedule(Duration),
  Cancel,
}

#[derive(Debug)]
pub struct RejectionExpiry {
  delay:  Duration,
  hidden: HashSet<Uuid>,
  last:   HashMap<Uuid, OrderStatus>,
}

impl RejectionExpiry {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      hidden: HashSet::new(),
      last: HashMap::new(),
    }
  }

  pub fn is_hidden(&self, id: Uuid) -> bool { self.hidden.contains(&id) }

  /// Observe the current revision of `order` at wall time `now`.
  pub fn observe(&mut self, order: &Order, now: DateTime<Utc>) -> TimerAction {
    let status = order.status();
    let previous = self.last.insert(order.id, status);

    let Some(started) = order.rejection_started() else {
      let was_hidden = self.hidden.remove(&order.id);
      return if was_hidden || previous == Some(OrderStatus::RejectedByServer) {
        TimerAction::Cancel
      } else {
        TimerAction::Keep
      };
    };

    let elapsed = (now - started).to_std().unwrap_or(Duration::ZERO);
    if elapsed >= self.delay {
      self.hidden.insert(order.id);
      return TimerAction::Cancel;
    }

    self.hidden.remove(&order.id);
    if previous == Some(OrderStatus::RejectedByServer) {
      TimerAction::Keep
    } else {
      TimerAction::Schedule(self.delay - elapsed)
    }
  }

  /// The deferred hide for `id` elapsed.
  pub fn expire(&mut self, id: Uuid) -> bool {
    if self.last.get(&id) == Some(&OrderStatus::RejectedByServer) {
      self.hidden.insert(id)
    } else {
      false
    }
  }

  /// The order is gone; its timer must be cancelled.
  pub fn forget(&mut self, id: Uuid) {
    self.hidden.remove(&id);
    self.last.remove(&id);
  }
}
