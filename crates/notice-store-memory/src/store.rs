//! [`MemoryStore`] — the in-process implementation of [`OrderStore`].

use std::{collections::HashMap, sync::Arc};

use notice_core::{
  order::Order,
  store::{ChangeEvent, ChangeFeed, ChangeKind, OrderStore, Scope},
};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::{Error, OrderRow, Result};

/// Default number of change events buffered per subscriber.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An order table held in process memory.
///
/// Clones share the same rows and change feed.
#[derive(Clone)]
pub struct MemoryStore {
  inner: Arc<Inner>,
}

struct Inner {
  rows: RwLock<HashMap<Uuid, OrderRow>>,
  feed: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::with_capacity(DEFAULT_FEED_CAPACITY) }

  /// A store whose subscribers may fall `capacity` events behind before
  /// being asked to resync.
  pub fn with_capacity(capacity: usize) -> Self {
    let (feed, _) = broadcast::channel(capacity.max(1));
    Self {
      inner: Arc::new(Inner {
        rows: RwLock::new(HashMap::new()),
        feed,
      }),
    }
  }

  /// Number of stored rows.
  pub async fn len(&self) -> usize { self.inner.rows.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.len().await == 0 }

  fn publish(&self, kind: ChangeKind, order: Order) {
    // No subscribers is not an error.
    let receivers = self.inner.feed.send(ChangeEvent { kind, order }).unwrap_or(0);
    tracing::trace!(?kind, receivers, "published change event");
  }
}

impl Default for MemoryStore {
  fn default() -> Self { Self::new() }
}

// ─── OrderStore impl ─────────────────────────────────────────────────────────

impl OrderStore for MemoryStore {
  type Error = Error;

  async fn fetch(&self, scope: &Scope) -> Result<Vec<Order>> {
    let rows = self.inner.rows.read().await;
    let mut visible: Vec<&OrderRow> = rows
      .values()
      .filter(|row| scope.allows(row.restaurant_id))
      .collect();
    visible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    visible.into_iter().map(OrderRow::decode).collect()
  }

  async fn fetch_one(&self, id: Uuid) -> Result<Option<Order>> {
    let rows = self.inner.rows.read().await;
    rows.get(&id).map(OrderRow::decode).transpose()
  }

  async fn save(&self, order: Order) -> Result<Order> {
    let row = OrderRow::encode(&order)?;
    let stored = row.decode()?;

    let existed = {
      let mut rows = self.inner.rows.write().await;
      rows.insert(order.id, row).is_some()
    };

    let kind = if existed { ChangeKind::Update } else { ChangeKind::Insert };
    tracing::debug!(order_id = %stored.id, status = %stored.status(), ?kind, "saved order");
    self.publish(kind, stored.clone());
    Ok(stored)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let removed = self.inner.rows.write().await.remove(&id);
    let Some(row) = removed else {
      return Ok(false);
    };
    let order = row.decode()?;
    tracing::debug!(order_id = %id, "deleted order");
    self.publish(ChangeKind::Delete, order);
    Ok(true)
  }

  async fn subscribe(&self) -> Result<ChangeFeed> {
    Ok(ChangeFeed::new(self.inner.feed.subscribe()))
  }
}
