//! Plain-text rendering of terminal views and events.

use notice_terminal::{
  TerminalEvent,
  view::{OrderCard, TerminalView},
};

pub fn view_lines(view: &TerminalView) -> Vec<String> {
  let mut lines = Vec::new();
  if !view.tabs.is_empty() {
    let tabs: Vec<String> = view
      .tabs
      .iter()
      .map(|t| {
        let marker = if t.active { "*" } else { "" };
        format!("{marker}{} ({})", t.label, t.count)
      })
      .collect();
    lines.push(format!("tabs: {}", tabs.join("  ")));
  }
  let s = view.summary;
  lines.push(format!(
    "{} awaiting approval, {} ready to dispatch, {} with kitchen",
    s.awaiting_approval, s.ready_to_dispatch, s.with_kitchen
  ));
  if view.orders.is_empty() {
    lines.push("(no notices)".into());
  }
  lines.extend(view.orders.iter().map(card_line));
  lines
}

pub fn card_line(card: &OrderCard) -> String {
  let mut line = format!(
    "{}  [{}]  {}  {}",
    card.id,
    card.badge.label,
    card.customer,
    card.items.join(", ")
  );
  if let Some(table) = &card.table_number {
    line.push_str(&format!("  table {table}"));
  }
  if !card.allergies.is_empty() {
    line.push_str(&format!("  allergies: {}", card.allergies.join(", ")));
  }
  if let Some(q) = &card.question {
    let answer = q.response.map_or("pending", |a| a.label());
    line.push_str(&format!("  Q: {} ({answer})", q.text));
  }
  if let Some(message) = card.message {
    line.push_str(&format!("  {message}"));
  }
  line
}

/// One line per notification or alert; renders are printed separately.
pub fn event_line(event: &TerminalEvent) -> Option<String> {
  match event {
    TerminalEvent::Render(_) => None,
    TerminalEvent::Notify(n) => Some(format!("notice {}: {}", n.order_id, n.message)),
    TerminalEvent::Alert(a) if a.blocking => Some(format!("!! {}", a.message)),
    TerminalEvent::Alert(a) => Some(format!("warning: {}", a.message)),
  }
}
