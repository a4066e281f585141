//! Error type for `notice-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("order {0} has no restaurant id")]
  MissingRestaurant(uuid::Uuid),

  #[error("order payload is not a JSON object")]
  MalformedPayload,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
