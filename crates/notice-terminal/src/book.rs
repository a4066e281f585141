//! [`OrderBook`] — a terminal's local copy of the shared orders.
//!
//! Inputs arrive from polls, push events and the terminal's own writes, in any
//! order and possibly more than once. Merging is keyed on `updated_at`: an
//! incoming revision replaces the local one only if it is strictly newer, so
//! redelivery is a no-op and a slow poll cannot roll back a fresh push.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use notice_core::order::Order;
use uuid::Uuid;

/// What a merge did to one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
  Upserted(Uuid),
  Removed(Uuid),
}

#[derive(Debug, Default)]
pub struct OrderBook {
  orders:     HashMap<Uuid, Order>,
  /// Last revision seen for each deleted order.
  tombstones: HashMap<Uuid, DateTime<Utc>>,
}

impl OrderBook {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, id: Uuid) -> Option<&Order> { self.orders.get(&id) }

  pub fn len(&self) -> usize { self.orders.len() }

  pub fn is_empty(&self) -> bool { self.orders.is_empty() }

  /// Orders oldest first, ties broken by id.
  pub fn iter(&self) -> impl Iterator<Item = &Order> {
    let mut orders: Vec<&Order> = self.orders.values().collect();
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    orders.into_iter()
  }

  /// Merge one revision. Returns `None` when nothing changed.
  pub fn upsert(&mut self, order: Order) -> Option<Change> {
    let id = order.id;
    if self
      .tombstones
      .get(&id)
      .is_some_and(|deleted| order.updated_at <= *deleted)
    {
      return None;
    }
    match self.orders.get(&id) {
      Some(existing) if order.updated_at <= existing.updated_at => None,
      _ => {
        self.tombstones.remove(&id);
        self.orders.insert(id, order);
        Some(Change::Upserted(id))
      }
    }
  }

  /// Put back an earlier revision after a failed write, regardless of age.
  pub fn revert(&mut self, order: Order) -> Change {
    let id = order.id;
    self.orders.insert(id, order);
    Change::Upserted(id)
  }

  /// Apply a `DELETE`. `revision` is the deleted order's last `updated_at`.
  pub fn remove(&mut self, id: Uuid, revision: DateTime<Utc>) -> Option<Change> {
    let entry = self.tombstones.entry(id).or_insert(revision);
    if revision > *entry {
      *entry = revision;
    }
    self.orders.remove(&id).map(|_| Change::Removed(id))
  }

  /// Merge a full fetch that was requested at `requested_at`.
  ///
  /// Orders missing from the snapshot are dropped unless they changed after
  /// the fetch began, in which case the snapshot simply predates them.
  pub fn apply_snapshot(&mut self, orders: Vec<Order>, requested_at: DateTime<Utc>) -> Vec<Change> {
    let present: std::collections::HashSet<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut changes: Vec<Change> = orders.into_iter().filter_map(|o| self.upsert(o)).collect();

    let vanished: Vec<(Uuid, DateTime<Utc>)> = self
      .orders
      .values()
      .filter(|o| !present.contains(&o.id) && o.updated_at <= requested_at)
      .map(|o| (o.id, o.updated_at))
      .collect();
    for (id, revision) in vanished {
      changes.extend(self.remove(id, revision));
    }
    changes
  }
}
