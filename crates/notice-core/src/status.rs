//! The notice lifecycle statuses and how each terminal presents them.
//!
//! Wire values are the strings stored in the `status` column and payload, so
//! they must stay stable across releases.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum OrderStatus {
  #[serde(rename = "draft")]
  #[strum(serialize = "draft")]
  Draft,

  #[serde(rename = "awaiting_user_submission")]
  #[strum(serialize = "awaiting_user_submission")]
  CodeAssigned,

  #[serde(rename = "awaiting_server_approval")]
  #[strum(serialize = "awaiting_server_approval")]
  SubmittedToServer,

  #[serde(rename = "queued_for_kitchen")]
  #[strum(serialize = "queued_for_kitchen")]
  QueuedForKitchen,

  #[serde(rename = "with_kitchen")]
  #[strum(serialize = "with_kitchen")]
  WithKitchen,

  #[serde(rename = "acknowledged")]
  #[strum(serialize = "acknowledged")]
  Acknowledged,

  #[serde(rename = "awaiting_user_response")]
  #[strum(serialize = "awaiting_user_response")]
  AwaitingUserResponse,

  #[serde(rename = "question_answered")]
  #[strum(serialize = "question_answered")]
  QuestionAnswered,

  #[serde(rename = "rejected_by_server")]
  #[strum(serialize = "rejected_by_server")]
  RejectedByServer,

  #[serde(rename = "rescinded_by_diner")]
  #[strum(serialize = "rescinded_by_diner")]
  RescindedByDiner,

  #[serde(rename = "rejected_by_kitchen")]
  #[strum(serialize = "rejected_by_kitchen")]
  RejectedByKitchen,
}

/// Colour family a terminal uses for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
  Muted,
  Info,
  Warn,
  Success,
  Danger,
}

/// A status badge: label plus tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Descriptor {
  pub label: &'static str,
  pub tone:  Tone,
}

const fn badge(label: &'static str, tone: Tone) -> Descriptor { Descriptor { label, tone } }

impl OrderStatus {
  pub fn as_str(self) -> &'static str { self.into() }

  /// No transition leaves a terminal status.
  pub fn is_terminal(self) -> bool {
    matches!(
      self,
      Self::Acknowledged
        | Self::RejectedByServer
        | Self::RescindedByDiner
        | Self::RejectedByKitchen
    )
  }

  /// The status has been handed to the server, so a diner is waiting on it.
  pub fn is_submitted(self) -> bool { !matches!(self, Self::Draft | Self::CodeAssigned) }

  /// Badge shown on the server terminal.
  pub fn server_descriptor(self) -> Descriptor {
    match self {
      Self::Draft => badge("Draft", Tone::Muted),
      Self::CodeAssigned => badge("Waiting for diner", Tone::Muted),
      Self::SubmittedToServer => badge("Needs approval", Tone::Warn),
      Self::QueuedForKitchen => badge("Ready to dispatch", Tone::Info),
      Self::WithKitchen => badge("Sent to kitchen", Tone::Success),
      Self::Acknowledged => badge("Acknowledged", Tone::Success),
      Self::AwaitingUserResponse => badge("Awaiting diner response", Tone::Warn),
      Self::QuestionAnswered => badge("Diner responded", Tone::Success),
      Self::RejectedByServer => badge("Rejected", Tone::Danger),
      Self::RescindedByDiner => badge("Rescinded by diner", Tone::Muted),
      Self::RejectedByKitchen => badge("Rejected by kitchen", Tone::Danger),
    }
  }

  /// Badge shown on the kitchen terminal.
  pub fn kitchen_descriptor(self) -> Descriptor {
    match self {
      Self::WithKitchen | Self::QuestionAnswered => {
        badge("Awaiting acknowledgement", Tone::Warn)
      }
      Self::AwaitingUserResponse => badge("Waiting on diner", Tone::Info),
      other => other.server_descriptor(),
    }
  }

  /// The one-line status update a diner receives.
  pub fn diner_message(self) -> Option<&'static str> {
    Some(match self {
      Self::Draft | Self::CodeAssigned => return None,
      Self::SubmittedToServer => "Your notice is waiting for server approval.",
      Self::QueuedForKitchen => {
        "Your notice has been approved and queued for the kitchen."
      }
      Self::WithKitchen => "Your notice is now with the kitchen.",
      Self::Acknowledged => "The kitchen acknowledged your notice.",
      Self::AwaitingUserResponse => "The kitchen has a follow-up question.",
      Self::QuestionAnswered => "Your response was sent to the kitchen.",
      Self::RejectedByServer => "The server rejected your notice.",
      Self::RescindedByDiner => "You rescinded this notice.",
      Self::RejectedByKitchen => "The kitchen rejected your notice.",
    })
  }
}
