//! Error type for `notice-terminal`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] notice_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("order {0} belongs to a restaurant outside this terminal's scope")]
  OutOfScope(Uuid),

  #[error("the terminal has stopped")]
  Stopped,
}

impl Error {
  /// Precondition failures leave every copy of the order untouched.
  pub fn is_precondition(&self) -> bool {
    match self {
      Self::Core(e) => e.is_precondition(),
      Self::OutOfScope(_) => true,
      Self::Store(_) | Self::Stopped => false,
    }
  }

  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
