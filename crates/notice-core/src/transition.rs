//! Pure transition functions over [`Order`].
//!
//! [`apply`] is the only way an order's status changes. It never mutates its
//! input: on success it returns the next revision of the order, on failure the
//! caller's copy is exactly as it was.
//!
//! | Action | Actor | From | To |
//! |--------|-------|------|----|
//! | assign code | Diner | draft | code assigned |
//! | submit | Diner | draft, code assigned | submitted to server |
//! | approve | Server | submitted to server | queued for kitchen |
//! | dispatch | Server | queued for kitchen | with kitchen |
//! | reject (server) | Server | submitted to server | rejected by server |
//! | acknowledge | Kitchen | with kitchen, question answered | acknowledged |
//! | ask question | Kitchen | with kitchen, awaiting user response | awaiting user response |
//! | answer | Diner | awaiting user response | question answered |
//! | reject (kitchen) | Kitchen | with kitchen, question answered | rejected by kitchen |
//! | rescind | Diner | any non-terminal | rescinded by diner |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _};

use crate::{
  Error, Result,
  actor::{ChefIdentity, Role},
  code::ServerCode,
  order::{Answer, AuditEntry, DiningMode, KitchenQuestion, Order},
  status::{OrderStatus, OrderStatus as S},
};

// ─── Actions ─────────────────────────────────────────────────────────────────

/// An actor's intent, with whatever payload the transition records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
  AssignCode { code: String },
  Submit,
  Approve,
  Dispatch,
  RejectByServer { reason: Option<String> },
  Acknowledge { chef: ChefIdentity },
  AskQuestion { text: String },
  Answer { response: Answer },
  RejectByKitchen { reason: Option<String> },
  Rescind,
}

/// The payload-free discriminant of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
  #[strum(serialize = "assign a server code to")]
  AssignCode,
  #[strum(serialize = "submit")]
  Submit,
  #[strum(serialize = "approve")]
  Approve,
  #[strum(serialize = "dispatch")]
  Dispatch,
  #[strum(serialize = "reject")]
  RejectByServer,
  #[strum(serialize = "acknowledge")]
  Acknowledge,
  #[strum(serialize = "ask a question about")]
  AskQuestion,
  #[strum(serialize = "answer")]
  Answer,
  #[strum(serialize = "reject")]
  RejectByKitchen,
  #[strum(serialize = "rescind")]
  Rescind,
}

impl ActionKind {
  /// The only role allowed to perform this action.
  pub fn entitled(self) -> Role {
    match self {
      Self::AssignCode | Self::Submit | Self::Answer | Self::Rescind => Role::Diner,
      Self::Approve | Self::Dispatch | Self::RejectByServer => Role::Server,
      Self::Acknowledge | Self::AskQuestion | Self::RejectByKitchen => Role::Kitchen,
    }
  }

  /// Whether `status` is a legal source for this action.
  pub fn accepts(self, status: OrderStatus) -> bool {
    match self {
      Self::AssignCode => status == S::Draft,
      Self::Submit => matches!(status, S::Draft | S::CodeAssigned),
      Self::Approve | Self::RejectByServer => status == S::SubmittedToServer,
      Self::Dispatch => status == S::QueuedForKitchen,
      Self::Acknowledge | Self::RejectByKitchen => {
        matches!(status, S::WithKitchen | S::QuestionAnswered)
      }
      Self::AskQuestion => matches!(status, S::WithKitchen | S::AwaitingUserResponse),
      Self::Answer => status == S::AwaitingUserResponse,
      Self::Rescind => !status.is_terminal(),
    }
  }

  pub fn target(self) -> OrderStatus {
    match self {
      Self::AssignCode => S::CodeAssigned,
      Self::Submit => S::SubmittedToServer,
      Self::Approve => S::QueuedForKitchen,
      Self::Dispatch => S::WithKitchen,
      Self::RejectByServer => S::RejectedByServer,
      Self::Acknowledge => S::Acknowledged,
      Self::AskQuestion => S::AwaitingUserResponse,
      Self::Answer => S::QuestionAnswered,
      Self::RejectByKitchen => S::RejectedByKitchen,
      Self::Rescind => S::RescindedByDiner,
    }
  }

  /// Actions `role` could take on an order in `status`, in declaration order.
  pub fn available(role: Role, status: OrderStatus) -> Vec<ActionKind> {
    Self::iter()
      .filter(|k| k.entitled() == role && k.accepts(status))
      .collect()
  }
}

impl Action {
  pub fn kind(&self) -> ActionKind {
    match self {
      Self::AssignCode { .. } => ActionKind::AssignCode,
      Self::Submit => ActionKind::Submit,
      Self::Approve => ActionKind::Approve,
      Self::Dispatch => ActionKind::Dispatch,
      Self::RejectByServer { .. } => ActionKind::RejectByServer,
      Self::Acknowledge { .. } => ActionKind::Acknowledge,
      Self::AskQuestion { .. } => ActionKind::AskQuestion,
      Self::Answer { .. } => ActionKind::Answer,
      Self::RejectByKitchen { .. } => ActionKind::RejectByKitchen,
      Self::Rescind => ActionKind::Rescind,
    }
  }
}

// ─── Apply ───────────────────────────────────────────────────────────────────

/// Apply `action` on behalf of `role` at time `at`.
///
/// Fails with [`Error::Rescinded`] for any action on a rescinded order,
/// [`Error::InvalidTransition`] when the status is not a legal source,
/// [`Error::NotEntitled`] when `role` does not own the action, and
/// [`Error::MissingPrerequisite`] when the action's payload is incomplete.
pub fn apply(order: &Order, role: Role, action: &Action, at: DateTime<Utc>) -> Result<Order> {
  let kind = action.kind();
  let status = order.status();

  if status == S::RescindedByDiner {
    return Err(Error::Rescinded(order.id));
  }
  if !kind.accepts(status) {
    return Err(Error::InvalidTransition { action: kind, status });
  }
  if kind.entitled() != role {
    return Err(Error::NotEntitled { role, action: kind });
  }

  let mut next = order.clone();
  let message = match action {
    Action::AssignCode { code } => {
      let parsed = ServerCode::parse(code)
        .ok_or_else(|| Error::MissingPrerequisite("Enter a server code.".into()))?;
      next.table_number = parsed.table_number.clone();
      next.server_code = Some(parsed.to_string());
      format!("Entered code for {}.", parsed.server_name())
    }
    Action::Submit => {
      validate_submission(&next)?;
      "Submitted notice to server.".to_string()
    }
    Action::Approve => "Marked ready for kitchen timing.".to_string(),
    Action::Dispatch => "Dispatched to kitchen tablet.".to_string(),
    Action::RejectByServer { reason } => {
      next.mark_rejected(at);
      match non_blank(reason.as_deref()) {
        Some(reason) => format!("Rejected: {reason}"),
        None => "Rejected the notice.".to_string(),
      }
    }
    Action::Acknowledge { chef } => {
      next.push_audit(AuditEntry {
        chef_id:   chef.chef_id.clone(),
        chef_name: chef.chef_name.clone(),
        role:      chef.role.clone(),
        at,
      });
      format!("{} acknowledged the notice.", chef.chef_name)
    }
    Action::AskQuestion { text } => {
      let text = non_blank(Some(text.as_str())).ok_or_else(|| {
        Error::MissingPrerequisite("Enter a yes/no question for the diner.".into())
      })?;
      *next.kitchen_question_mut() = Some(KitchenQuestion {
        text:        text.to_string(),
        response:    None,
        asked_at:    at,
        answered_at: None,
      });
      format!("Sent a yes/no question: \"{text}\"")
    }
    Action::Answer { response } => {
      let question = next.kitchen_question_mut().as_mut().ok_or_else(|| {
        Error::MissingPrerequisite("There is no kitchen question to answer.".into())
      })?;
      question.response = Some(*response);
      question.answered_at = Some(at);
      format!("Answered {}.", response.label())
    }
    Action::RejectByKitchen { reason } => match non_blank(reason.as_deref()) {
      Some(reason) => format!("Rejected by kitchen: {reason}"),
      None => "Rejected by kitchen.".to_string(),
    },
    Action::Rescind => {
      next.mark_rescinded(at);
      "Rescinded the notice.".to_string()
    }
  };

  next.set_status(kind.target(), at);
  next.push_history(role, message, at);
  Ok(next)
}

fn validate_submission(order: &Order) -> Result<()> {
  if order.items.is_empty() {
    return Err(Error::MissingPrerequisite(
      "Select at least one item to submit.".into(),
    ));
  }
  if order.dining_mode == DiningMode::DineIn
    && non_blank(order.server_code.as_deref()).is_none()
  {
    return Err(Error::MissingPrerequisite(
      "Enter the code your server shared when they're ready.".into(),
    ));
  }
  Ok(())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests;
