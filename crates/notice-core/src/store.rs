//! The `OrderStore` trait, scoping, and the change feed.
//!
//! The trait is implemented by backing-store adapters (e.g.
//! `notice-store-memory`). Terminals depend on this abstraction, never on a
//! concrete backend. The store offers no transactions and no compare-and-set:
//! the last full-record save wins.

use std::{collections::BTreeSet, future::Future};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::order::Order;

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Which restaurants a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  /// Privileged access across every restaurant.
  Unrestricted,
  /// Only these restaurants. An empty set sees nothing.
  Restaurants(BTreeSet<Uuid>),
}

impl Scope {
  /// An empty id list means "everything" only for a privileged caller.
  pub fn new(restaurant_ids: impl IntoIterator<Item = Uuid>, privileged: bool) -> Self {
    let ids: BTreeSet<Uuid> = restaurant_ids.into_iter().collect();
    if privileged && ids.is_empty() {
      Self::Unrestricted
    } else {
      Self::Restaurants(ids)
    }
  }

  pub fn single(restaurant_id: Uuid) -> Self {
    Self::Restaurants(BTreeSet::from([restaurant_id]))
  }

  pub fn allows(&self, restaurant_id: Uuid) -> bool {
    match self {
      Self::Unrestricted => true,
      Self::Restaurants(ids) => ids.contains(&restaurant_id),
    }
  }
}

// ─── Change feed ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
  Insert,
  Update,
  Delete,
}

/// One change-data-capture event. For `Delete` the order is the last stored
/// revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
  pub kind:  ChangeKind,
  pub order: Order,
}

/// What a subscriber receives.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
  Change(ChangeEvent),
  /// Events were dropped because the subscriber fell behind; the local view
  /// must be rebuilt from a full fetch.
  Resync,
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ChangeFeed {
  rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeFeed {
  pub fn new(rx: broadcast::Receiver<ChangeEvent>) -> Self { Self { rx } }

  /// Wait for the next message. `None` once the store has gone away.
  pub async fn recv(&mut self) -> Option<FeedMessage> {
    match self.rx.recv().await {
      Ok(event) => Some(FeedMessage::Change(event)),
      Err(broadcast::error::RecvError::Lagged(_)) => Some(FeedMessage::Resync),
      Err(broadcast::error::RecvError::Closed) => None,
    }
  }

  pub fn unsubscribe(self) {}
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the shared order table.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait OrderStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List orders visible to `scope`, oldest first.
  fn fetch<'a>(
    &'a self,
    scope: &'a Scope,
  ) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send + 'a;

  /// Retrieve one order by id. Returns `None` if not found.
  fn fetch_one(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Order>, Self::Error>> + Send + '_;

  /// Upsert the whole record by id and return what was stored.
  ///
  /// Saving the same record twice leaves the same stored state.
  fn save(&self, order: Order) -> impl Future<Output = Result<Order, Self::Error>> + Send + '_;

  /// Operator-level removal. Returns `false` if the order did not exist.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Subscribe to change events for every order in the table.
  fn subscribe(&self) -> impl Future<Output = Result<ChangeFeed, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_scope_is_unrestricted_only_when_privileged() {
    let id = Uuid::new_v4();
    assert_eq!(Scope::new([], true), Scope::Unrestricted);
    assert!(!Scope::new([], false).allows(id));
    assert!(Scope::new([id], true).allows(id));
    assert!(!Scope::new([id], true).allows(Uuid::new_v4()));
  }

  #[tokio::test]
  async fn lagging_feed_asks_for_resync() {
    let (tx, rx) = broadcast::channel::<ChangeEvent>(1);
    let mut feed = ChangeFeed::new(rx);
    let order: Order = serde_json::from_value(serde_json::json!({
      "id": Uuid::new_v4(),
      "restaurantId": Uuid::new_v4(),
      "createdAt": "2026-01-01T12:00:00Z",
      "updatedAt": "2026-01-01T12:00:00Z",
      "status": "with_kitchen",
    }))
    .unwrap();
    for _ in 0..3 {
      tx.send(ChangeEvent { kind: ChangeKind::Update, order: order.clone() }).unwrap();
    }
    assert_eq!(feed.recv().await, Some(FeedMessage::Resync));
    assert!(matches!(feed.recv().await, Some(FeedMessage::Change(_))));
    drop(tx);
    assert_eq!(feed.recv().await, None);
  }
}
