//! Async HTTP client for the notice-server JSON API.
//!
//! [`ApiClient`] is both the [`OrderStore`] and the [`NoticeNotifier`] a
//! terminal runs against. The HTTP surface has no push transport, so
//! [`OrderStore::subscribe`] always fails and terminals fall back to polling.

use std::time::Duration;

use notice_core::{
  notify::NoticeNotifier,
  order::Order,
  store::{ChangeFeed, OrderStore, Scope},
};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Connection settings for the notice API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("{method} {path} failed: {source}")]
  Transport {
    method: Method,
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {path} → {status}")]
  Status {
    method: Method,
    path:   String,
    status: StatusCode,
  },

  #[error("deserialising {what}: {source}")]
  Decode {
    what:   &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("the HTTP API has no change feed")]
  PushUnsupported,
}

/// Async HTTP client for the notice JSON API.
///
/// The inner [`reqwest::Client`] is `Arc`-based, so clones share a pool.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DinerNotice {
  order_id: Uuid,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn send(
    &self,
    method: Method,
    path: String,
    build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
  ) -> Result<Response, ClientError> {
    let req = build(self.client.request(method.clone(), self.url(&path)));
    req
      .send()
      .await
      .map_err(|source| ClientError::Transport { method, path, source })
  }

  fn expect_success(method: Method, path: String, resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
      Ok(resp)
    } else {
      Err(ClientError::Status { method, path, status })
    }
  }
}

/// `restaurant_ids` query value for a scope, or `None` for unrestricted.
fn restaurant_ids(scope: &Scope) -> Option<String> {
  match scope {
    Scope::Unrestricted => None,
    Scope::Restaurants(ids) => Some(
      ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(","),
    ),
  }
}

// ─── OrderStore impl ─────────────────────────────────────────────────────────

impl OrderStore for ApiClient {
  type Error = ClientError;

  /// `GET /orders[?restaurant_ids=...]`
  async fn fetch(&self, scope: &Scope) -> Result<Vec<Order>, ClientError> {
    let query = restaurant_ids(scope);
    if query.as_deref() == Some("") {
      return Ok(Vec::new());
    }
    let path = "/orders".to_string();
    let resp = self
      .send(Method::GET, path.clone(), |req| match &query {
        Some(ids) => req.query(&[("restaurant_ids", ids)]),
        None => req,
      })
      .await?;
    let resp = Self::expect_success(Method::GET, path, resp)?;
    resp
      .json()
      .await
      .map_err(|source| ClientError::Decode { what: "orders", source })
  }

  /// `GET /orders/:id`
  async fn fetch_one(&self, id: Uuid) -> Result<Option<Order>, ClientError> {
    let path = format!("/orders/{id}");
    let resp = self.send(Method::GET, path.clone(), |req| req).await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let resp = Self::expect_success(Method::GET, path, resp)?;
    resp
      .json()
      .await
      .map(Some)
      .map_err(|source| ClientError::Decode { what: "order", source })
  }

  /// `PUT /orders/:id`
  async fn save(&self, order: Order) -> Result<Order, ClientError> {
    let path = format!("/orders/{}", order.id);
    let resp = self
      .send(Method::PUT, path.clone(), |req| req.json(&order))
      .await?;
    let resp = Self::expect_success(Method::PUT, path, resp)?;
    resp
      .json()
      .await
      .map_err(|source| ClientError::Decode { what: "saved order", source })
  }

  /// `DELETE /orders/:id`
  async fn delete(&self, id: Uuid) -> Result<bool, ClientError> {
    let path = format!("/orders/{id}");
    let resp = self.send(Method::DELETE, path.clone(), |req| req).await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(false);
    }
    Self::expect_success(Method::DELETE, path, resp)?;
    Ok(true)
  }

  async fn subscribe(&self) -> Result<ChangeFeed, ClientError> { Err(ClientError::PushUnsupported) }
}

// ─── NoticeNotifier impl ─────────────────────────────────────────────────────

impl NoticeNotifier for ApiClient {
  type Error = ClientError;

  /// `POST /notifications/diner-notice`
  async fn notify_diner(&self, order_id: Uuid) -> Result<(), ClientError> {
    let path = "/notifications/diner-notice".to_string();
    let resp = self
      .send(Method::POST, path.clone(), |req| req.json(&DinerNotice { order_id }))
      .await?;
    Self::expect_success(Method::POST, path, resp)?;
    Ok(())
  }
}
