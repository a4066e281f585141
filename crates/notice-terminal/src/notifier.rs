//! One-shot status-change detection.
//!
//! Only orders the [`OrderBook`](crate::book::OrderBook) accepted are fed in,
//! so a stale revision can never look like a transition.

use std::collections::HashMap;

use notice_core::{order::Order, status::OrderStatus};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
  pub order_id: Uuid,
  pub from:     OrderStatus,
  pub to:       OrderStatus,
}

#[derive(Debug, Default)]
pub struct StatusChangeNotifier {
  seen: HashMap<Uuid, OrderStatus>,
}

impl StatusChangeNotifier {
  pub fn new() -> Self { Self::default() }

  /// Record `order`'s status. Returns a transition only when a different
  /// status was observed before; the first sighting is silent.
  pub fn observe(&mut self, order: &Order) -> Option<Transition> {
    let to = order.status();
    let from = self.seen.insert(order.id, to)?;
    (from != to).then_some(Transition { order_id: order.id, from, to })
  }

  pub fn forget(&mut self, id: Uuid) { self.seen.remove(&id); }

  /// Put back a status recorded before an unsaved local change, so the
  /// rollback itself stays silent.
  pub fn restore(&mut self, id: Uuid, status: OrderStatus) { self.seen.insert(id, status); }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use notice_core::{
    actor::Role,
    order::NewOrder,
    transition::{Action, apply},
  };

  use super::*;

  fn submitted() -> Order {
    let draft = Order::draft(
      NewOrder {
        restaurant_id: Uuid::new_v4(),
        server_code: Some("A123".into()),
        items: vec!["Pho".into()],
        ..NewOrder::default()
      },
      Utc::now(),
    );
    apply(&draft, Role::Diner, &Action::Submit, Utc::now()).unwrap()
  }

  #[test]
  fn first_sighting_is_silent_then_each_change_fires_once() {
    let mut notifier = StatusChangeNotifier::new();
    let order = submitted();
    assert_eq!(notifier.observe(&order), None);
    assert_eq!(notifier.observe(&order), None);

    let approved = apply(&order, Role::Server, &Action::Approve, Utc::now()).unwrap();
    let fired = notifier.observe(&approved).unwrap();
    assert_eq!(fired.from, OrderStatus::SubmittedToServer);
    assert_eq!(fired.to, OrderStatus::QueuedForKitchen);
    assert_eq!(notifier.observe(&approved), None);
  }

  #[test]
  fn forgotten_order_starts_over() {
    let mut notifier = StatusChangeNotifier::new();
    let order = submitted();
    notifier.observe(&order);
    notifier.forget(order.id);
    let approved = apply(&order, Role::Server, &Action::Approve, Utc::now()).unwrap();
    assert_eq!(notifier.observe(&approved), None);
  }

  #[test]
  fn restored_status_makes_the_rollback_silent() {
    let mut notifier = StatusChangeNotifier::new();
    let order = submitted();
    notifier.observe(&order);
    let approved = apply(&order, Role::Server, &Action::Approve, Utc::now()).unwrap();
    assert!(notifier.observe(&approved).is_some());

    notifier.restore(order.id, OrderStatus::SubmittedToServer);
    assert_eq!(notifier.observe(&order), None);
    let fired = notifier.observe(&approved).unwrap();
    assert_eq!(fired.from, OrderStatus::SubmittedToServer);
  }
}
