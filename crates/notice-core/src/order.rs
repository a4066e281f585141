//! The order (notice) entity.
//!
//! An order is the single mutable record all three terminals share. Routing
//! and content fields are public; lifecycle fields are private and only
//! change through [`crate::transition::apply`], which is what keeps `history`
//! and `face_id_audit` append-only and `rejected_at` write-once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{actor::Role, code::server_key, status::OrderStatus};

// ─── Supporting types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiningMode {
  #[default]
  DineIn,
  /// Delivery or pickup; no server code is involved.
  Delivery,
}

/// The diner's reply to a kitchen follow-up question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
  Yes,
  No,
}

impl Answer {
  pub fn label(self) -> &'static str {
    match self {
      Self::Yes => "YES",
      Self::No => "NO",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenQuestion {
  pub text:        String,
  pub response:    Option<Answer>,
  pub asked_at:    DateTime<Utc>,
  #[serde(default)]
  pub answered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub actor:   Role,
  pub message: String,
  pub at:      DateTime<Utc>,
}

/// One chef confirmation, recorded on acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
  pub chef_id:   String,
  pub chef_name: String,
  pub role:      String,
  pub at:        DateTime<Utc>,
}

// ─── Order ───────────────────────────────────────────────────────────────────

/// Input for a fresh draft order.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
  pub restaurant_id: Uuid,
  pub diner_id:      Option<String>,
  pub customer_name: String,
  pub dining_mode:   DiningMode,
  pub server_code:   Option<String>,
  pub items:         Vec<String>,
  pub allergies:     Vec<String>,
  pub diets:         Vec<String>,
  pub custom_notes:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id:            Uuid,
  pub restaurant_id: Uuid,
  #[serde(default)]
  pub diner_id:      Option<String>,
  #[serde(default)]
  pub customer_name: String,
  #[serde(default)]
  pub dining_mode:   DiningMode,
  #[serde(default)]
  pub server_code:   Option<String>,
  #[serde(default)]
  pub table_number:  Option<String>,
  #[serde(default)]
  pub items:         Vec<String>,
  #[serde(default)]
  pub allergies:     Vec<String>,
  #[serde(default)]
  pub diets:         Vec<String>,
  #[serde(default)]
  pub custom_notes:  Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,

  status:           OrderStatus,
  #[serde(default)]
  rejected_at:      Option<DateTime<Utc>>,
  #[serde(default)]
  rescinded_at:     Option<DateTime<Utc>>,
  #[serde(default)]
  kitchen_question: Option<KitchenQuestion>,
  #[serde(default)]
  history:          Vec<HistoryEntry>,
  #[serde(default)]
  face_id_audit:    Vec<AuditEntry>,
}

impl Order {
  /// Start a draft with a freshly generated id.
  pub fn draft(input: NewOrder, at: DateTime<Utc>) -> Self {
    let table_number = input
      .server_code
      .as_deref()
      .and_then(crate::code::ServerCode::parse)
      .and_then(|c| c.table_number);
    Self {
      id: Uuid::new_v4(),
      restaurant_id: input.restaurant_id,
      diner_id: input.diner_id,
      customer_name: input.customer_name,
      dining_mode: input.dining_mode,
      server_code: input.server_code,
      table_number,
      items: input.items,
      allergies: input.allergies,
      diets: input.diets,
      custom_notes: input.custom_notes,
      created_at: at,
      updated_at: at,
      status: OrderStatus::Draft,
      rejected_at: None,
      rescinded_at: None,
      kitchen_question: None,
      history: Vec::new(),
      face_id_audit: Vec::new(),
    }
  }

  // ── Lifecycle accessors ───────────────────────────────────────────────

  pub fn status(&self) -> OrderStatus { self.status }

  pub fn rejected_at(&self) -> Option<DateTime<Utc>> { self.rejected_at }

  pub fn rescinded_at(&self) -> Option<DateTime<Utc>> { self.rescinded_at }

  pub fn kitchen_question(&self) -> Option<&KitchenQuestion> {
    self.kitchen_question.as_ref()
  }

  pub fn history(&self) -> &[HistoryEntry] { &self.history }

  pub fn face_id_audit(&self) -> &[AuditEntry] { &self.face_id_audit }

  // ── Derived ───────────────────────────────────────────────────────────

  /// First word of the customer name, or "Guest".
  pub fn first_name(&self) -> &str {
    self
      .customer_name
      .split_whitespace()
      .next()
      .unwrap_or("Guest")
  }

  /// Server grouping key: the first four characters of the server code.
  pub fn server_key(&self) -> String { server_key(self.server_code.as_deref()) }

  /// When the rejection expiry clock started. Falls back to `updated_at` for
  /// records written before `rejected_at` existed.
  pub fn rejection_started(&self) -> Option<DateTime<Utc>> {
    (self.status == OrderStatus::RejectedByServer)
      .then(|| self.rejected_at.unwrap_or(self.updated_at))
  }

  // ── Transition-only mutation ──────────────────────────────────────────

  pub(crate) fn set_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
    self.status = status;
    self.updated_at = at;
  }

  pub(crate) fn push_history(&mut self, actor: Role, message: String, at: DateTime<Utc>) {
    self.history.push(HistoryEntry { actor, message, at });
  }

  pub(crate) fn push_audit(&mut self, entry: AuditEntry) { self.face_id_audit.push(entry); }

  pub(crate) fn mark_rejected(&mut self, at: DateTime<Utc>) {
    if self.rejected_at.is_none() {
      self.rejected_at = Some(at);
    }
  }

  pub(crate) fn mark_rescinded(&mut self, at: DateTime<Utc>) { self.rescinded_at = Some(at); }

  pub(crate) fn kitchen_question_mut(&mut self) -> &mut Option<KitchenQuestion> {
    &mut self.kitchen_question
  }
}
