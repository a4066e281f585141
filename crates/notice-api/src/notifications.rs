//! The diner notification side-channel.
//!
//! Terminals post here after a save that changed an order's status. Delivery
//! to the diner's device is out of scope; the endpoint resolves the message
//! the diner would see and logs it.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use notice_core::{status::OrderStatus, store::OrderStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DinerNoticeBody {
  pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
  pub order_id: Uuid,
  pub status:   OrderStatus,
  /// `None` for statuses the diner is not told about.
  pub message:  Option<String>,
}

/// `POST /notifications/diner-notice` — body: `{"orderId":"..."}`
pub async fn diner_notice<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<DinerNoticeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OrderStore,
{
  let order = store
    .fetch_one(body.order_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::OrderNotFound(body.order_id))?;

  let status = order.status();
  let message = status.diner_message().map(str::to_string);
  tracing::info!(
    order_id = %order.id,
    diner_id = order.diner_id.as_deref().unwrap_or("-"),
    %status,
    message = message.as_deref().unwrap_or("-"),
    "diner notice queued"
  );

  Ok((StatusCode::ACCEPTED, Json(Accepted { order_id: order.id, status, message })))
}
