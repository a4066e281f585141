//! Who is acting on a notice.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The role an actor plays. Every transition is entitled to exactly one role.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(ascii_case_insensitive)]
pub enum Role {
  Diner,
  Server,
  Kitchen,
}

/// The chef confirming a notice at the kitchen terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefIdentity {
  pub chef_id:   String,
  pub chef_name: String,
  pub role:      String,
}

impl ChefIdentity {
  pub fn new(chef_id: impl Into<String>, chef_name: impl Into<String>) -> Self {
    Self {
      chef_id:   chef_id.into(),
      chef_name: chef_name.into(),
      role:      "Kitchen".to_string(),
    }
  }
}

impl Default for ChefIdentity {
  /// The shared kitchen login used when no individual chef is identified.
  fn default() -> Self { Self::new("kitchen-default", "Kitchen team") }
}
