//! Handler failures and their JSON bodies.
//!
//! Every error answers with `{"error": "<message>"}` where the message is the
//! variant's `Display` text.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("order {0} not found")]
  OrderNotFound(Uuid),

  /// One entry of a `restaurant_ids` query did not parse.
  #[error("invalid restaurant id: {0}")]
  InvalidRestaurantId(String),

  /// A `PUT` body naming a different order than its path.
  #[error("body id {body} does not match path id {path}")]
  IdMismatch { path: Uuid, body: Uuid },

  #[error("order store failed: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
      Self::InvalidRestaurantId(_) | Self::IdMismatch { .. } => StatusCode::BAD_REQUEST,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let Self::Store(e) = &self {
      tracing::error!(error = %e, "order store request failed");
    }
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn each_failure_maps_to_its_status() {
    let id = Uuid::nil();
    assert_eq!(ApiError::OrderNotFound(id).status(), StatusCode::NOT_FOUND);
    assert_eq!(
      ApiError::InvalidRestaurantId("nope".into()).status(),
      StatusCode::BAD_REQUEST
    );
    let mismatch = ApiError::IdMismatch { path: id, body: Uuid::from_u128(1) };
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      mismatch.to_string(),
      format!("body id {} does not match path id {id}", Uuid::from_u128(1))
    );
    let store = ApiError::store(std::io::Error::other("disk full"));
    assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.to_string(), "order store failed: disk full");
  }
}
