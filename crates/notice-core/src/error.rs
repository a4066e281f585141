//! Error types for `notice-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{actor::Role, status::OrderStatus, transition::ActionKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("this notice was rescinded by the diner ({0})")]
  Rescinded(Uuid),

  #[error("cannot {action} a notice that is {status}")]
  InvalidTransition {
    action: ActionKind,
    status: OrderStatus,
  },

  #[error("{role} may not {action}")]
  NotEntitled { role: Role, action: ActionKind },

  #[error("{0}")]
  MissingPrerequisite(String),

  #[error("order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether this error was raised before any state changed and should be
  /// surfaced to the operator as a blocking alert.
  pub fn is_precondition(&self) -> bool {
    matches!(
      self,
      Self::Rescinded(_)
        | Self::InvalidTransition { .. }
        | Self::NotEntitled { .. }
        | Self::MissingPrerequisite(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
