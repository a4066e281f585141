//! Conversion between [`Order`] and the stored row shape.
//!
//! The row keeps `id`, `restaurant_id`, `status`, `created_at` and
//! `updated_at` as columns and the full order as a JSON payload. On decode the
//! column values win over whatever the payload says.

use chrono::{DateTime, Utc};
use notice_core::order::Order;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
  pub id:            Uuid,
  pub restaurant_id: Uuid,
  pub status:        String,
  pub payload:       Value,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl OrderRow {
  pub fn encode(order: &Order) -> Result<Self> {
    if order.restaurant_id.is_nil() {
      return Err(Error::MissingRestaurant(order.id));
    }
    Ok(Self {
      id:            order.id,
      restaurant_id: order.restaurant_id,
      status:        order.status().to_string(),
      payload:       serde_json::to_value(order)?,
      created_at:    order.created_at,
      updated_at:    order.updated_at,
    })
  }

  pub fn decode(&self) -> Result<Order> {
    let mut fields: Map<String, Value> = match &self.payload {
      Value::Object(map) => map.clone(),
      Value::Null => Map::new(),
      _ => return Err(Error::MalformedPayload),
    };
    fields.insert("id".into(), Value::String(self.id.to_string()));
    fields.insert(
      "restaurantId".into(),
      Value::String(self.restaurant_id.to_string()),
    );
    fields.insert("status".into(), Value::String(self.status.clone()));
    fields.insert("createdAt".into(), serde_json::to_value(self.created_at)?);
    fields.insert("updatedAt".into(), serde_json::to_value(self.updated_at)?);
    Ok(serde_json::from_value(Value::Object(fields))?)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;
  use notice_core::{order::NewOrder, status::OrderStatus};
  use serde_json::json;

  use super::*;

  fn order() -> Order {
    Order::draft(
      NewOrder {
        restaurant_id: Uuid::new_v4(),
        customer_name: "Ada".into(),
        items: vec!["Pho".into()],
        ..NewOrder::default()
      },
      Utc.with_ymd_and_hms(2026, 2, 2, 9, 0, 0).unwrap(),
    )
  }

  #[test]
  fn columns_override_payload() {
    let mut row = OrderRow::encode(&order()).unwrap();
    row.status = "with_kitchen".into();
    row.updated_at = Utc.with_ymd_and_hms(2026, 2, 2, 9, 5, 0).unwrap();

    let decoded = row.decode().unwrap();
    assert_eq!(decoded.status(), OrderStatus::WithKitchen);
    assert_eq!(decoded.updated_at, row.updated_at);
    assert_eq!(decoded.items, vec!["Pho".to_string()]);
  }

  #[test]
  fn empty_payload_decodes_from_columns() {
    let row = OrderRow {
      id:            Uuid::new_v4(),
      restaurant_id: Uuid::new_v4(),
      status:        "awaiting_server_approval".into(),
      payload:       Value::Null,
      created_at:    Utc::now(),
      updated_at:    Utc::now(),
    };
    let decoded = row.decode().unwrap();
    assert_eq!(decoded.id, row.id);
    assert_eq!(decoded.status(), OrderStatus::SubmittedToServer);
  }

  #[test]
  fn unknown_status_column_fails_decode() {
    let mut row = OrderRow::encode(&order()).unwrap();
    row.status = "teleported".into();
    assert!(matches!(row.decode(), Err(Error::Json(_))));
  }

  #[test]
  fn non_object_payload_is_rejected() {
    let mut row = OrderRow::encode(&order()).unwrap();
    row.payload = json!([1, 2, 3]);
    assert!(matches!(row.decode(), Err(Error::MalformedPayload)));
  }

  #[test]
  fn nil_restaurant_is_refused() {
    let mut o = order();
    o.restaurant_id = Uuid::nil();
    assert!(matches!(OrderRow::encode(&o), Err(Error::MissingRestaurant(_))));
  }
}
