//! Which statuses each staff terminal lists, and which count as completed.
//!
//! Completed orders are only listed while "show completed" is on.

use notice_core::status::OrderStatus;

use crate::terminal::TerminalKind;

use OrderStatus as S;

/// Whether `kind` lists orders in `status` at all.
pub fn is_relevant(kind: TerminalKind, status: OrderStatus) -> bool {
  match kind {
    TerminalKind::Diner => true,
    TerminalKind::Server => status.is_submitted(),
    TerminalKind::Kitchen => matches!(
      status,
      S::WithKitchen
        | S::Acknowledged
        | S::AwaitingUserResponse
        | S::QuestionAnswered
        | S::RescindedByDiner
        | S::RejectedByKitchen
    ),
  }
}

/// Whether `kind` treats `status` as finished business.
///
/// Server rejections are absent here: they leave the server queue through
/// rejection expiry instead.
pub fn is_completed(kind: TerminalKind, status: OrderStatus) -> bool {
  match kind {
    TerminalKind::Diner => false,
    TerminalKind::Server => matches!(
      status,
      S::WithKitchen
        | S::Acknowledged
        | S::AwaitingUserResponse
        | S::QuestionAnswered
        | S::RescindedByDiner
        | S::RejectedByKitchen
    ),
    TerminalKind::Kitchen => matches!(
      status,
      S::Acknowledged | S::RescindedByDiner | S::RejectedByKitchen
    ),
  }
}
