//! Server tabs: orders grouped by the server that handed out the code.

use notice_core::{code::UNASSIGNED_SERVER, order::Order};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerGroup {
  pub key:       String,
  pub label:     String,
  pub order_ids: Vec<Uuid>,
}

/// Group by server key, groups in order of first appearance.
pub fn group_by_server<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<ServerGroup> {
  let mut groups: Vec<ServerGroup> = Vec::new();
  for order in orders {
    let key = order.server_key();
    match groups.iter_mut().find(|g| g.key == key) {
      Some(group) => group.order_ids.push(order.id),
      None => groups.push(ServerGroup {
        label: label_for(&key),
        key,
        order_ids: vec![order.id],
      }),
    }
  }
  groups
}

fn label_for(key: &str) -> String {
  if key == UNASSIGNED_SERVER {
    "Unassigned".to_string()
  } else {
    format!("Server {key}")
  }
}

/// The one active tab. Switching tabs never touches orders.
#[derive(Debug, Default, Clone)]
pub struct TabSelector {
  active: Option<String>,
}

impl TabSelector {
  pub fn new() -> Self { Self::default() }

  pub fn select(&mut self, key: impl Into<String>) { self.active = Some(key.into()); }

  /// The active key among `groups`, falling back to the first group when the
  /// chosen one is gone.
  pub fn resolve(&mut self, groups: &[ServerGroup]) -> Option<&str> {
    let still_there = self
      .active
      .as_ref()
      .is_some_and(|key| groups.iter().any(|g| &g.key == key));
    if !still_there {
      self.active = groups.first().map(|g| g.key.clone());
    }
    self.active.as_deref()
  }
}
