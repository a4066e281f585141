//! JSON HTTP surface for the shared order table.
//!
//! Exposes an axum [`Router`] backed by any [`notice_core::store::OrderStore`].
//! Auth, TLS and push transport are the caller's responsibility; terminals
//! talking to this router run on polling alone.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", notice_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod notifications;
pub mod orders;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use notice_core::store::OrderStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `NOTICE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// Change events buffered per subscriber before it must resync.
  pub feed_capacity: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".into(),
      port:          8080,
      feed_capacity: notice_store_memory::DEFAULT_FEED_CAPACITY,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: OrderStore + 'static,
{
  Router::new()
    .route("/orders", get(orders::list::<S>))
    .route(
      "/orders/{id}",
      get(orders::get_one::<S>)
        .put(orders::save::<S>)
        .delete(orders::delete::<S>),
    )
    .route("/notifications/diner-notice", post(notifications::diner_notice::<S>))
    .with_state(store)
}
