use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
};
use chrono::{TimeZone as _, Utc};
use notice_core::{
  actor::Role,
  order::{NewOrder, Order},
  status::OrderStatus,
  store::OrderStore,
  transition::{Action, apply},
};
use notice_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{api_router, notifications::Accepted};

fn submitted(restaurant_id: Uuid, minute: u32) -> Order {
  let at = Utc.with_ymd_and_hms(2026, 7, 4, 19, minute, 0).unwrap();
  let draft = Order::draft(
    NewOrder {
      restaurant_id,
      customer_name: "Sam Diner".into(),
      server_code: Some("A12307".into()),
      items: vec!["Pad Thai".into()],
      ..NewOrder::default()
    },
    at,
  );
  apply(&draft, Role::Diner, &Action::Submit, at).unwrap()
}

fn app() -> (Arc<MemoryStore>, Router) {
  let store = Arc::new(MemoryStore::new());
  (Arc::clone(&store), api_router(store))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

fn get(uri: &str) -> Request<Body> { Request::get(uri).body(Body::empty()).unwrap() }

fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(serde_json::to_vec(body).unwrap()))
    .unwrap()
}

// ─── Orders ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_restaurant_ids() {
  let (store, app) = app();
  let a = Uuid::new_v4();
  let b = Uuid::new_v4();
  let first = store.save(submitted(a, 1)).await.unwrap();
  let second = store.save(submitted(b, 2)).await.unwrap();
  store.save(submitted(Uuid::new_v4(), 3)).await.unwrap();

  let (status, body) = send(&app, get(&format!("/orders?restaurant_ids={a},{b}"))).await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<&str> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|o| o["id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, vec![first.id.to_string(), second.id.to_string()]);

  let (_, body) = send(&app, get("/orders")).await;
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_rejects_malformed_restaurant_ids() {
  let (_, app) = app();
  let (status, body) = send(&app, get("/orders?restaurant_ids=nope")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "invalid restaurant id: nope");
}

#[tokio::test]
async fn put_then_get_round_trips_the_order() {
  let (_, app) = app();
  let order = submitted(Uuid::new_v4(), 1);
  let uri = format!("/orders/{}", order.id);

  let (status, saved) = send(&app, json_request("PUT", &uri, &order)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(saved["status"], "SUBMITTED_TO_SERVER");
  assert_eq!(saved["tableNumber"], "07");

  let (status, fetched) = send(&app, get(&uri)).await;
  assert_eq!(status, StatusCode::OK);
  let fetched: Order = serde_json::from_value(fetched).unwrap();
  assert_eq!(fetched, order);
}

#[tokio::test]
async fn put_refuses_mismatched_id() {
  let (store, app) = app();
  let order = submitted(Uuid::new_v4(), 1);
  let path_id = Uuid::new_v4();
  let (status, body) = send(
    &app,
    json_request("PUT", &format!("/orders/{path_id}"), &order),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["error"],
    format!("body id {} does not match path id {path_id}", order.id)
  );
  assert!(store.is_empty().await);
}

#[tokio::test]
async fn missing_order_is_404() {
  let (_, app) = app();
  let id = Uuid::new_v4();
  let (status, body) = send(&app, get(&format!("/orders/{id}"))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], format!("order {id} not found"));
}

#[tokio::test]
async fn delete_is_204_then_404() {
  let (store, app) = app();
  let order = store.save(submitted(Uuid::new_v4(), 1)).await.unwrap();
  let uri = format!("/orders/{}", order.id);
  let delete = || Request::delete(&uri).body(Body::empty()).unwrap();

  let (status, _) = send(&app, delete()).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, delete()).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn diner_notice_is_accepted_with_the_diner_message() {
  let (store, app) = app();
  let order = store.save(submitted(Uuid::new_v4(), 1)).await.unwrap();

  let (status, body) = send(
    &app,
    json_request("POST", "/notifications/diner-notice", &json!({ "orderId": order.id })),
  )
  .await;
  assert_eq!(status, StatusCode::ACCEPTED);
  let accepted: Accepted = serde_json::from_value(body).unwrap();
  assert_eq!(accepted, Accepted {
    order_id: order.id,
    status:   OrderStatus::SubmittedToServer,
    message:  Some("Your notice is waiting for server approval.".into()),
  });
}

#[tokio::test]
async fn diner_notice_for_unknown_order_is_404() {
  let (_, app) = app();
  let (status, _) = send(
    &app,
    json_request("POST", "/notifications/diner-notice", &json!({ "orderId": Uuid::new_v4() })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
