//! [`NoticeComposer`] — the diner's draft notice before submission.
//!
//! Dishes are collected into a selected list; the checked subset is what gets
//! submitted. A successful submission clears the submitted dishes along with
//! the server code and notes, so the composer is ready for the next notice.

use chrono::{DateTime, Utc};
use notice_core::{
  Error as CoreError,
  actor::Role,
  notify::NoticeNotifier,
  order::{DiningMode, NewOrder, Order},
  status::OrderStatus,
  store::OrderStore,
  transition::{Action, apply},
};
use uuid::Uuid;

use crate::{
  Result, SyncClient,
  accommodation::{DietConflicts, DishAccommodation, Menu, assess},
};

/// Saved diner profile data copied onto each notice.
#[derive(Debug, Clone, Default)]
pub struct DinerProfile {
  pub diner_id:  Option<String>,
  pub name:      Option<String>,
  pub allergies: Vec<String>,
  pub diets:     Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NoticeComposer {
  restaurant_id: Uuid,
  profile:       DinerProfile,
  selected:      Vec<String>,
  checked:       Vec<String>,
  pub name:        String,
  pub server_code: String,
  pub notes:       String,
  pub dining_mode: DiningMode,
}

impl NoticeComposer {
  pub fn new(restaurant_id: Uuid, profile: DinerProfile) -> Self {
    Self {
      restaurant_id,
      profile,
      selected: Vec::new(),
      checked: Vec::new(),
      name: String::new(),
      server_code: String::new(),
      notes: String::new(),
      dining_mode: DiningMode::DineIn,
    }
  }

  // ── Dish selection ────────────────────────────────────────────────────

  /// Add a dish and check it. Adding a dish twice is a no-op.
  pub fn add_dish(&mut self, dish: impl Into<String>) {
    let dish = dish.into();
    if !self.selected.contains(&dish) {
      self.selected.push(dish.clone());
      self.checked.push(dish);
    }
  }

  pub fn remove_dish(&mut self, dish: &str) {
    self.selected.retain(|d| d != dish);
    self.checked.retain(|d| d != dish);
  }

  /// Check or uncheck a selected dish. Unknown dishes are ignored.
  pub fn set_checked(&mut self, dish: &str, checked: bool) {
    if !self.selected.iter().any(|d| d == dish) {
      return;
    }
    let present = self.checked.iter().any(|d| d == dish);
    if checked && !present {
      self.checked.push(dish.to_string());
    } else if !checked {
      self.checked.retain(|d| d != dish);
    }
  }

  pub fn selected(&self) -> &[String] { &self.selected }

  /// Checked dishes in selection order.
  pub fn checked(&self) -> Vec<String> {
    self
      .selected
      .iter()
      .filter(|d| self.checked.contains(d))
      .cloned()
      .collect()
  }

  /// Accommodation rows for every selected dish.
  pub fn accommodations(&self, menu: &Menu, conflicts: &DietConflicts) -> Vec<DishAccommodation> {
    self
      .selected
      .iter()
      .map(|d| assess(d, menu, &self.profile.allergies, &self.profile.diets, conflicts))
      .collect()
  }

  // ── Submission ────────────────────────────────────────────────────────

  /// Entered name, then profile name, then "Guest".
  pub fn resolved_name(&self) -> String {
    [Some(self.name.as_str()), self.profile.name.as_deref()]
      .into_iter()
      .flatten()
      .map(str::trim)
      .find(|n| !n.is_empty())
      .unwrap_or("Guest")
      .to_string()
  }

  /// Build the submitted order without writing anything.
  pub fn prepare(&self, at: DateTime<Utc>) -> Result<Order> {
    if self.restaurant_id.is_nil() {
      return Err(CoreError::MissingPrerequisite("Choose a restaurant first.".into()).into());
    }
    let non_blank = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
    let draft = Order::draft(
      NewOrder {
        restaurant_id: self.restaurant_id,
        diner_id:      self.profile.diner_id.clone(),
        customer_name: self.resolved_name(),
        dining_mode:   self.dining_mode,
        server_code:   match self.dining_mode {
          DiningMode::DineIn => non_blank(&self.server_code),
          DiningMode::Delivery => None,
        },
        items:         self.checked(),
        allergies:     self.profile.allergies.clone(),
        diets:         self.profile.diets.clone(),
        custom_notes:  non_blank(&self.notes),
      },
      at,
    );
    Ok(apply(&draft, Role::Diner, &Action::Submit, at)?)
  }

  /// Validate, write the notice, then clear what was submitted.
  ///
  /// Nothing is written and nothing is cleared if validation or the save
  /// fails.
  pub async fn submit<S, N>(&mut self, sync: &SyncClient<S, N>, at: DateTime<Utc>) -> Result<Order>
  where
    S: OrderStore + 'static,
    N: NoticeNotifier + 'static,
  {
    let order = self.prepare(at)?;
    let saved = sync.save(order, Some(OrderStatus::Draft)).await?;
    tracing::info!(order_id = %saved.id, items = saved.items.len(), "submitted notice");
    self.submitted(&saved);
    Ok(saved)
  }

  /// Clear what `saved` carried off.
  pub(crate) fn submitted(&mut self, saved: &Order) {
    self.selected.retain(|d| !saved.items.contains(d));
    self.checked.retain(|d| !saved.items.contains(d));
    self.server_code.clear();
    self.notes.clear();
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use notice_core::{notify::NoopNotifier, store::Scope};
  use notice_store_memory::MemoryStore;

  use super::*;
  use crate::Error;

  fn composer(restaurant_id: Uuid) -> NoticeComposer {
    NoticeComposer::new(
      restaurant_id,
      DinerProfile {
        diner_id:  Some("diner-1".into()),
        name:      Some("Priya Patel".into()),
        allergies: vec!["peanut".into()],
        diets:     Vec::new(),
      },
    )
  }

  fn sync(store: &Arc<MemoryStore>, restaurant_id: Uuid) -> SyncClient<MemoryStore, NoopNotifier> {
    SyncClient::new(Arc::clone(store), Arc::new(NoopNotifier), Scope::single(restaurant_id))
  }

  #[tokio::test]
  async fn submit_writes_one_notice_and_clears_submitted_dishes() {
    let restaurant = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let mut c = composer(restaurant);
    c.add_dish("Pad Thai");
    c.add_dish("Spring Rolls");
    c.set_checked("Spring Rolls", false);
    c.server_code = "A123".into();
    c.notes = "severe allergy".into();

    let order = c.submit(&sync(&store, restaurant), Utc::now()).await.unwrap();
    assert_eq!(order.status(), OrderStatus::SubmittedToServer);
    assert_eq!(order.history().len(), 1);
    assert_eq!(order.items, vec!["Pad Thai".to_string()]);
    assert_eq!(order.customer_name, "Priya Patel");
    assert_eq!(order.diner_id.as_deref(), Some("diner-1"));

    assert_eq!(c.selected(), ["Spring Rolls".to_string()]);
    assert!(c.checked().is_empty());
    assert!(c.server_code.is_empty());
    assert!(c.notes.is_empty());
    assert!(store.fetch_one(order.id).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn dine_in_without_code_writes_nothing() {
    let restaurant = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let mut c = composer(restaurant);
    c.add_dish("Pad Thai");

    let err = c.submit(&sync(&store, restaurant), Utc::now()).await.unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::MissingPrerequisite(_))));
    assert!(store.is_empty().await);
    assert_eq!(c.selected(), ["Pad Thai".to_string()]);
  }

  #[tokio::test]
  async fn nothing_checked_is_refused() {
    let restaurant = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let mut c = composer(restaurant);
    c.add_dish("Pad Thai");
    c.set_checked("Pad Thai", false);
    c.dining_mode = DiningMode::Delivery;

    let err = c.submit(&sync(&store, restaurant), Utc::now()).await.unwrap_err();
    assert_eq!(err.to_string(), "Select at least one item to submit.");
    assert!(store.is_empty().await);
  }

  #[test]
  fn name_falls_back_to_profile_then_guest() {
    let mut c = composer(Uuid::new_v4());
    assert_eq!(c.resolved_name(), "Priya Patel");
    c.name = " Sam ".into();
    assert_eq!(c.resolved_name(), "Sam");

    let anon = NoticeComposer::new(Uuid::new_v4(), DinerProfile::default());
    assert_eq!(anon.resolved_name(), "Guest");
  }

  #[test]
  fn delivery_drops_the_server_code() {
    let mut c = composer(Uuid::new_v4());
    c.add_dish("Pho");
    c.server_code = "A123".into();
    c.dining_mode = DiningMode::Delivery;
    let order = c.prepare(Utc::now()).unwrap();
    assert_eq!(order.server_code, None);
    assert_eq!(order.dining_mode, DiningMode::Delivery);
  }

  #[test]
  fn duplicate_dish_is_added_once() {
    let mut c = composer(Uuid::new_v4());
    c.add_dish("Pho");
    c.add_dish("Pho");
    assert_eq!(c.selected().len(), 1);
    c.remove_dish("Pho");
    assert!(c.selected().is_empty());
  }
}
