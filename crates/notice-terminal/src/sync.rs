//! [`SyncClient`] — the fetch/save/subscribe surface every terminal uses.
//!
//! Wraps an [`OrderStore`] with the caller's scope, and fires the diner
//! notification side-channel after a save that changed status.

use std::sync::Arc;

use notice_core::{
  notify::NoticeNotifier,
  order::Order,
  status::OrderStatus,
  store::{ChangeFeed, OrderStore, Scope},
};
use uuid::Uuid;

use crate::{Error, Result};

pub struct SyncClient<S, N> {
  store:    Arc<S>,
  notifier: Arc<N>,
  scope:    Scope,
}

impl<S, N> Clone for SyncClient<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
      scope:    self.scope.clone(),
    }
  }
}

impl<S, N> SyncClient<S, N>
where
  S: OrderStore + 'static,
  N: NoticeNotifier + 'static,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, scope: Scope) -> Self {
    Self { store, notifier, scope }
  }

  pub fn scope(&self) -> &Scope { &self.scope }

  /// Every order visible to this client, oldest first.
  pub async fn fetch(&self) -> Result<Vec<Order>> {
    let orders = self.store.fetch(&self.scope).await.map_err(Error::store)?;
    let total = orders.len();
    // Adapters are trusted to scope, but an out-of-scope row must never leak
    // into a terminal's view.
    let orders: Vec<Order> = orders
      .into_iter()
      .filter(|o| self.scope.allows(o.restaurant_id))
      .collect();
    tracing::debug!(total, visible = orders.len(), "fetched orders");
    Ok(orders)
  }

  /// One order by id, or `None` if it is absent or outside the scope.
  pub async fn fetch_one(&self, id: Uuid) -> Result<Option<Order>> {
    let order = self.store.fetch_one(id).await.map_err(Error::store)?;
    Ok(order.filter(|o| self.scope.allows(o.restaurant_id)))
  }

  /// Write the whole record. `previous` is the status the caller started
  /// from; when it differs from what was saved the diner is notified.
  pub async fn save(&self, order: Order, previous: Option<OrderStatus>) -> Result<Order> {
    if !self.scope.allows(order.restaurant_id) {
      return Err(Error::OutOfScope(order.id));
    }
    let saved = self.store.save(order).await.map_err(Error::store)?;
    tracing::info!(order_id = %saved.id, status = %saved.status(), "saved order");

    if previous != Some(saved.status()) {
      self.notify_diner(saved.id);
    }
    Ok(saved)
  }

  pub async fn subscribe(&self) -> Result<ChangeFeed> {
    self.store.subscribe().await.map_err(Error::store)
  }

  /// Fire-and-forget; failures are logged and dropped.
  fn notify_diner(&self, order_id: Uuid) {
    let notifier = Arc::clone(&self.notifier);
    tokio::spawn(async move {
      if let Err(e) = notifier.notify_diner(order_id).await {
        tracing::warn!(order_id = %order_id, error = %e, "diner notification failed");
      }
    });
  }
}
