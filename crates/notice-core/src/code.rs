//! Server codes: the short code a server hands a dine-in diner.
//!
//! The first four characters identify the server; whatever follows is the
//! table number. `A12307` is server `A123`, table `07`.

use std::fmt;

/// Key used for orders with no server code at all.
pub const UNASSIGNED_SERVER: &str = "0000";

const SERVER_ID_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCode {
  pub server_id:    String,
  pub table_number: Option<String>,
}

impl ServerCode {
  /// Split a raw code. Returns `None` for blank input.
  pub fn parse(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return None;
    }
    let split = trimmed
      .char_indices()
      .nth(SERVER_ID_LEN)
      .map_or(trimmed.len(), |(i, _)| i);
    let (id, rest) = trimmed.split_at(split);
    let rest = rest.trim();
    Some(Self {
      server_id:    id.to_string(),
      table_number: (!rest.is_empty()).then(|| rest.to_string()),
    })
  }

  pub fn server_name(&self) -> String { format!("Server {}", self.server_id) }
}

impl fmt::Display for ServerCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.server_id)?;
    if let Some(table) = &self.table_number {
      write!(f, "{table}")?;
    }
    Ok(())
  }
}

/// The grouping key for an optional raw code.
pub fn server_key(raw: Option<&str>) -> String {
  raw
    .and_then(ServerCode::parse)
    .map_or_else(|| UNASSIGNED_SERVER.to_string(), |c| c.server_id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_server_and_table() {
    let code = ServerCode::parse("A12307").unwrap();
    assert_eq!(code.server_id, "A123");
    assert_eq!(code.table_number.as_deref(), Some("07"));
    assert_eq!(code.server_name(), "Server A123");
    assert_eq!(code.to_string(), "A12307");
  }

  #[test]
  fn short_code_has_no_table() {
    let code = ServerCode::parse(" A1 ").unwrap();
    assert_eq!(code.server_id, "A1");
    assert_eq!(code.table_number, None);
  }

  #[test]
  fn blank_code_groups_as_unassigned() {
    assert!(ServerCode::parse("   ").is_none());
    assert_eq!(server_key(None), UNASSIGNED_SERVER);
    assert_eq!(server_key(Some("")), UNASSIGNED_SERVER);
    assert_eq!(server_key(Some("B77712")), "B777");
  }
}
