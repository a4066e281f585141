//! Transition table coverage: every action against every status.

use chrono::{Duration, TimeZone as _, Utc};
use strum::IntoEnumIterator as _;
use uuid::Uuid;

use super::*;
use crate::order::NewOrder;

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap() }

fn draft() -> Order {
  Order::draft(
    NewOrder {
      restaurant_id: Uuid::new_v4(),
      customer_name: "Sam Diner".into(),
      server_code: Some("A123".into()),
      items: vec!["Pad Thai".into()],
      allergies: vec!["peanut".into()],
      ..NewOrder::default()
    },
    t0(),
  )
}

fn sample_action(kind: ActionKind) -> Action {
  match kind {
    ActionKind::AssignCode => Action::AssignCode { code: "A12307".into() },
    ActionKind::Submit => Action::Submit,
    ActionKind::Approve => Action::Approve,
    ActionKind::Dispatch => Action::Dispatch,
    ActionKind::RejectByServer => Action::RejectByServer { reason: Some("Kitchen closed".into()) },
    ActionKind::Acknowledge => Action::Acknowledge { chef: ChefIdentity::new("c1", "Sam") },
    ActionKind::AskQuestion => Action::AskQuestion { text: "Is soy ok?".into() },
    ActionKind::Answer => Action::Answer { response: Answer::Yes },
    ActionKind::RejectByKitchen => Action::RejectByKitchen { reason: None },
    ActionKind::Rescind => Action::Rescind,
  }
}

fn step(order: &Order, kind: ActionKind, minutes: i64) -> Order {
  apply(
    order,
    kind.entitled(),
    &sample_action(kind),
    t0() + Duration::minutes(minutes),
  )
  .unwrap()
}

/// Drive a fresh draft along legal transitions until it reaches `status`.
fn order_in(status: OrderStatus) -> Order {
  use ActionKind as K;
  let path: &[K] = match status {
    S::Draft => &[],
    S::CodeAssigned => &[K::AssignCode],
    S::SubmittedToServer => &[K::Submit],
    S::QueuedForKitchen => &[K::Submit, K::Approve],
    S::WithKitchen => &[K::Submit, K::Approve, K::Dispatch],
    S::Acknowledged => &[K::Submit, K::Approve, K::Dispatch, K::Acknowledge],
    S::AwaitingUserResponse => &[K::Submit, K::Approve, K::Dispatch, K::AskQuestion],
    S::QuestionAnswered => {
      &[K::Submit, K::Approve, K::Dispatch, K::AskQuestion, K::Answer]
    }
    S::RejectedByServer => &[K::Submit, K::RejectByServer],
    S::RescindedByDiner => &[K::Submit, K::Rescind],
    S::RejectedByKitchen => &[K::Submit, K::Approve, K::Dispatch, K::RejectByKitchen],
  };
  let mut order = draft();
  for (i, kind) in path.iter().enumerate() {
    order = step(&order, *kind, i as i64 + 1);
  }
  assert_eq!(order.status(), status);
  order
}

// ─── Table ───────────────────────────────────────────────────────────────────

#[test]
fn transition_succeeds_iff_listed() {
  for status in OrderStatus::iter() {
    for kind in ActionKind::iter() {
      let before = order_in(status);
      let snapshot = before.clone();
      let result = apply(&before, kind.entitled(), &sample_action(kind), t0() + Duration::hours(1));

      match result {
        Ok(after) => {
          assert!(kind.accepts(status), "{kind:?} from {status:?} should fail");
          assert_eq!(after.status(), kind.target());
          assert_eq!(after.history().len(), before.history().len() + 1);
          assert_eq!(after.updated_at, t0() + Duration::hours(1));
        }
        Err(err) => {
          assert!(!kind.accepts(status), "{kind:?} from {status:?} failed: {err}");
          assert!(err.is_precondition());
          assert_eq!(before, snapshot);
        }
      }
    }
  }
}

#[test]
fn terminal_statuses_accept_nothing() {
  for status in OrderStatus::iter().filter(|s| s.is_terminal()) {
    for kind in ActionKind::iter() {
      assert!(!kind.accepts(status), "{kind:?} accepted terminal {status:?}");
    }
  }
}

#[test]
fn wrong_role_is_rejected_even_from_a_legal_source() {
  let order = order_in(S::WithKitchen);
  let err = apply(&order, Role::Server, &sample_action(ActionKind::Acknowledge), t0())
    .unwrap_err();
  assert!(matches!(
    err,
    Error::NotEntitled { role: Role::Server, action: ActionKind::Acknowledge }
  ));
}

#[test]
fn any_action_on_rescinded_order_reports_rescinded() {
  let order = order_in(S::RescindedByDiner);
  for kind in ActionKind::iter() {
    let err = apply(&order, kind.entitled(), &sample_action(kind), t0()).unwrap_err();
    assert!(matches!(err, Error::Rescinded(id) if id == order.id));
  }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn submit_from_draft_writes_one_history_entry() {
  let order = step(&draft(), ActionKind::Submit, 0);
  assert_eq!(order.status(), S::SubmittedToServer);
  assert_eq!(order.history().len(), 1);
  assert_eq!(order.history()[0].actor, Role::Diner);
}

#[test]
fn dine_in_submit_requires_server_code() {
  let mut order = draft();
  order.server_code = None;
  let err = apply(&order, Role::Diner, &Action::Submit, t0()).unwrap_err();
  assert!(matches!(err, Error::MissingPrerequisite(_)));

  order.dining_mode = DiningMode::Delivery;
  assert!(apply(&order, Role::Diner, &Action::Submit, t0()).is_ok());
}

#[test]
fn submit_requires_items() {
  let mut order = draft();
  order.items.clear();
  let err = apply(&order, Role::Diner, &Action::Submit, t0()).unwrap_err();
  assert_eq!(err.to_string(), "Select at least one item to submit.");
}

#[test]
fn approve_then_dispatch_has_three_history_entries() {
  let order = order_in(S::WithKitchen);
  let messages: Vec<_> = order.history().iter().map(|h| h.message.as_str()).collect();
  assert_eq!(
    messages,
    vec![
      "Submitted notice to server.",
      "Marked ready for kitchen timing.",
      "Dispatched to kitchen tablet.",
    ]
  );
}

#[test]
fn acknowledge_records_chef_audit() {
  let order = order_in(S::WithKitchen);
  let chef = ChefIdentity::new("c1", "Sam");
  let acked = apply(&order, Role::Kitchen, &Action::Acknowledge { chef }, t0()).unwrap();
  assert_eq!(acked.status(), S::Acknowledged);
  assert_eq!(acked.face_id_audit().len(), 1);
  assert_eq!(acked.face_id_audit()[0].chef_id, "c1");
  assert_eq!(acked.face_id_audit()[0].chef_name, "Sam");
  assert_eq!(acked.history().last().unwrap().message, "Sam acknowledged the notice.");
}

#[test]
fn server_reject_stamps_rejected_at_once() {
  let order = order_in(S::SubmittedToServer);
  let at = t0() + Duration::minutes(10);
  let rejected = apply(&order, Role::Server, &Action::RejectByServer { reason: None }, at).unwrap();
  assert_eq!(rejected.rejected_at(), Some(at));
  assert_eq!(rejected.rejection_started(), Some(at));
  assert_eq!(rejected.history().last().unwrap().message, "Rejected the notice.");
}

#[test]
fn second_question_replaces_first() {
  let order = order_in(S::WithKitchen);
  let first = apply(
    &order,
    Role::Kitchen,
    &Action::AskQuestion { text: "Is soy ok?".into() },
    t0(),
  )
  .unwrap();
  let second = apply(
    &first,
    Role::Kitchen,
    &Action::AskQuestion { text: "Is sesame ok?".into() },
    t0() + Duration::minutes(1),
  )
  .unwrap();

  let question = second.kitchen_question().unwrap();
  assert_eq!(question.text, "Is sesame ok?");
  assert_eq!(question.response, None);
  assert_eq!(second.status(), S::AwaitingUserResponse);
}

#[test]
fn blank_question_is_refused() {
  let order = order_in(S::WithKitchen);
  let err = apply(
    &order,
    Role::Kitchen,
    &Action::AskQuestion { text: "  ".into() },
    t0(),
  )
  .unwrap_err();
  assert!(matches!(err, Error::MissingPrerequisite(_)));
}

#[test]
fn answer_records_response() {
  let order = order_in(S::AwaitingUserResponse);
  let answered = apply(
    &order,
    Role::Diner,
    &Action::Answer { response: Answer::No },
    t0() + Duration::minutes(9),
  )
  .unwrap();
  let question = answered.kitchen_question().unwrap();
  assert_eq!(question.response, Some(Answer::No));
  assert!(question.answered_at.is_some());
}

#[test]
fn rescind_pre_empts_kitchen() {
  let order = order_in(S::AwaitingUserResponse);
  let rescinded = apply(&order, Role::Diner, &Action::Rescind, t0()).unwrap();
  assert_eq!(rescinded.status(), S::RescindedByDiner);
  assert!(rescinded.rescinded_at().is_some());

  let err = apply(
    &rescinded,
    Role::Kitchen,
    &Action::Acknowledge { chef: ChefIdentity::default() },
    t0(),
  )
  .unwrap_err();
  assert!(matches!(err, Error::Rescinded(_)));
}

#[test]
fn available_actions_gate_buttons() {
  assert_eq!(
    ActionKind::available(Role::Server, S::SubmittedToServer),
    vec![ActionKind::Approve, ActionKind::RejectByServer]
  );
  assert_eq!(
    ActionKind::available(Role::Kitchen, S::QuestionAnswered),
    vec![ActionKind::Acknowledge, ActionKind::RejectByKitchen]
  );
  assert!(ActionKind::available(Role::Kitchen, S::Acknowledged).is_empty());
}
