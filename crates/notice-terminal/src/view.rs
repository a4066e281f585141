//! The render model a terminal emits after every change.
//!
//! Markup is someone else's job; this is just what to draw.

use notice_core::{
  order::{KitchenQuestion, Order},
  status::{Descriptor, OrderStatus},
  transition::ActionKind,
};
use serde::Serialize;
use uuid::Uuid;

use crate::terminal::TerminalKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCard {
  pub id:            Uuid,
  pub status:        OrderStatus,
  pub badge:         Descriptor,
  /// Diner-facing status line (diner terminal only).
  pub message:       Option<&'static str>,
  pub customer:      String,
  pub server_key:    String,
  pub table_number:  Option<String>,
  pub items:         Vec<String>,
  pub allergies:     Vec<String>,
  pub diets:         Vec<String>,
  pub custom_notes:  Option<String>,
  pub question:      Option<KitchenQuestion>,
  /// Buttons this terminal may offer right now.
  pub actions:       Vec<ActionKind>,
}

impl OrderCard {
  pub fn new(kind: TerminalKind, order: &Order) -> Self {
    let status = order.status();
    Self {
      id: order.id,
      status,
      badge: match kind {
        TerminalKind::Kitchen => status.kitchen_descriptor(),
        _ => status.server_descriptor(),
      },
      message: match kind {
        TerminalKind::Diner => status.diner_message(),
        _ => None,
      },
      customer: order.first_name().to_string(),
      server_key: order.server_key(),
      table_number: order.table_number.clone(),
      items: order.items.clone(),
      allergies: order.allergies.clone(),
      diets: order.diets.clone(),
      custom_notes: order.custom_notes.clone(),
      question: order.kitchen_question().cloned(),
      actions: ActionKind::available(kind.role(), status),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
  pub key:    String,
  pub label:  String,
  pub count:  usize,
  pub active: bool,
}

/// Counts across every visible order, not just the active tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub awaiting_approval: usize,
  pub ready_to_dispatch: usize,
  pub with_kitchen:      usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalView {
  pub kind:           TerminalKind,
  pub show_completed: bool,
  pub tabs:           Vec<Tab>,
  pub orders:         Vec<OrderCard>,
  pub summary:        Summary,
}

impl TerminalView {
  pub fn order(&self, id: Uuid) -> Option<&OrderCard> { self.orders.iter().find(|o| o.id == id) }

  pub fn contains(&self, id: Uuid) -> bool { self.order(id).is_some() }
}

/// A one-shot status-change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusNotification {
  pub order_id: Uuid,
  pub from:     OrderStatus,
  pub to:       OrderStatus,
  /// First name of the diner.
  pub customer: String,
  pub message:  String,
}

impl StatusNotification {
  pub fn new(kind: TerminalKind, order: &Order, from: OrderStatus) -> Self {
    let to = order.status();
    let message = match kind {
      TerminalKind::Diner => to
        .diner_message()
        .map_or_else(|| to.server_descriptor().label.to_string(), str::to_string),
      TerminalKind::Server => format!("{}: {}", order.first_name(), to.server_descriptor().label),
      TerminalKind::Kitchen => format!("{}: {}", order.first_name(), to.kitchen_descriptor().label),
    };
    Self {
      order_id: order.id,
      from,
      to,
      customer: order.first_name().to_string(),
      message,
    }
  }
}

/// A message for the operator. Blocking alerts need acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
  pub message:  String,
  pub blocking: bool,
}
