//! Handlers for `/orders` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/orders` | Optional `?restaurant_ids=a,b`; absent means every restaurant |
//! | `GET`    | `/orders/:id` | 404 if not found |
//! | `PUT`    | `/orders/:id` | Body: the whole order; 400 if the body id differs |
//! | `DELETE` | `/orders/:id` | 204, or 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use notice_core::{
  order::Order,
  store::{OrderStore, Scope},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Comma-separated restaurant ids.
  pub restaurant_ids: Option<String>,
}

impl ListParams {
  fn scope(&self) -> Result<Scope, ApiError> {
    let Some(raw) = self.restaurant_ids.as_deref() else {
      return Ok(Scope::Unrestricted);
    };
    let ids = raw
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| {
        s.parse::<Uuid>()
          .map_err(|_| ApiError::InvalidRestaurantId(s.to_string()))
      })
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Scope::new(ids, false))
  }
}

/// `GET /orders[?restaurant_ids=<id>,<id>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Order>>, ApiError>
where
  S: OrderStore,
{
  let scope = params.scope()?;
  let orders = store.fetch(&scope).await.map_err(ApiError::store)?;
  Ok(Json(orders))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /orders/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError>
where
  S: OrderStore,
{
  let order = store
    .fetch_one(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::OrderNotFound(id))?;
  Ok(Json(order))
}

// ─── Save ────────────────────────────────────────────────────────────────────

/// `PUT /orders/:id` — whole-record upsert.
pub async fn save<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(order): Json<Order>,
) -> Result<Json<Order>, ApiError>
where
  S: OrderStore,
{
  if order.id != id {
    return Err(ApiError::IdMismatch { path: id, body: order.id });
  }
  let saved = store.save(order).await.map_err(ApiError::store)?;
  tracing::info!(order_id = %saved.id, status = %saved.status(), "order saved");
  Ok(Json(saved))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /orders/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: OrderStore,
{
  if store.delete(id).await.map_err(ApiError::store)? {
    tracing::info!(order_id = %id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::OrderNotFound(id))
  }
}
