//! Per-dish accommodation rows for the diner's saved allergens and diets.
//!
//! Read-only: the composer shows these next to each selected dish so the
//! diner knows what the kitchen will be asked to handle. Matching is
//! case-insensitive on trimmed names.

use std::collections::HashMap;

use notice_core::status::Tone;
use serde::{Deserialize, Serialize};

// ─── Menu data ───────────────────────────────────────────────────────────────

/// What the menu knows about one dish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dish {
  pub name:                    String,
  pub allergens:               Vec<String>,
  /// Allergens the kitchen can leave out or substitute.
  pub removable_allergens:     Vec<String>,
  pub diets:                   Vec<String>,
  pub cross_contact_allergens: Vec<String>,
  pub cross_contact_diets:     Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Menu {
  dishes: HashMap<String, Dish>,
}

impl Menu {
  pub fn get(&self, name: &str) -> Option<&Dish> { self.dishes.get(&norm(name)) }
}

impl FromIterator<Dish> for Menu {
  fn from_iter<I: IntoIterator<Item = Dish>>(iter: I) -> Self {
    Self {
      dishes: iter.into_iter().map(|d| (norm(&d.name), d)).collect(),
    }
  }
}

/// Allergens that rule out each diet, e.g. `vegan → [milk, egg]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DietConflicts(HashMap<String, Vec<String>>);

impl DietConflicts {
  pub fn new<D, A>(entries: impl IntoIterator<Item = (D, Vec<A>)>) -> Self
  where
    D: AsRef<str>,
    A: AsRef<str>,
  {
    Self(
      entries
        .into_iter()
        .map(|(diet, allergens)| {
          (norm(diet.as_ref()), allergens.iter().map(|a| norm(a.as_ref())).collect())
        })
        .collect(),
    )
  }

  /// The dish's allergens that conflict with `diet`.
  fn blocking<'d>(&self, diet: &str, dish: &'d Dish) -> Vec<&'d str> {
    let Some(conflicts) = self.0.get(&norm(diet)) else {
      return Vec::new();
    };
    dish
      .allergens
      .iter()
      .filter(|a| conflicts.iter().any(|c| *c == norm(a)))
      .map(String::as_str)
      .collect()
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Contains,
  CanBeRemoved,
  CrossContactRisk,
  FreeOf,
  Meets,
  CanBeMade,
  NotCompatible,
}

impl Verdict {
  pub fn tone(self) -> Tone {
    match self {
      Self::FreeOf | Self::Meets => Tone::Success,
      Self::CanBeRemoved | Self::CanBeMade | Self::CrossContactRisk => Tone::Warn,
      Self::Contains | Self::NotCompatible => Tone::Danger,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
  /// The allergen or diet this row is about.
  pub subject: String,
  pub verdict: Verdict,
  pub label:   String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishAccommodation {
  pub dish:     String,
  /// `false` when the menu has no details for this dish.
  pub known:    bool,
  pub rows:     Vec<Row>,
  pub severity: Tone,
  pub badge:    &'static str,
}

/// Assess one dish against the diner's saved preferences.
pub fn assess(
  dish_name: &str,
  menu: &Menu,
  allergies: &[String],
  diets: &[String],
  conflicts: &DietConflicts,
) -> DishAccommodation {
  let Some(dish) = menu.get(dish_name) else {
    return DishAccommodation {
      dish:     dish_name.to_string(),
      known:    false,
      rows:     Vec::new(),
      severity: Tone::Warn,
      badge:    "Check with staff",
    };
  };

  let mut rows: Vec<Row> = allergies.iter().map(|a| allergen_row(dish, a)).collect();
  rows.extend(diets.iter().map(|d| diet_row(dish, d, conflicts)));

  let (severity, badge) = if rows.is_empty() {
    (Tone::Info, "No saved preferences")
  } else if rows.iter().any(|r| r.verdict.tone() == Tone::Danger) {
    (Tone::Danger, "Cannot be accommodated")
  } else if rows.iter().any(|r| r.verdict.tone() == Tone::Warn) {
    (Tone::Warn, "Can be removed/replaced")
  } else {
    (Tone::Success, "Meets all requirements")
  };

  DishAccommodation {
    dish: dish.name.clone(),
    known: true,
    rows,
    severity,
    badge,
  }
}

fn allergen_row(dish: &Dish, allergen: &str) -> Row {
  let verdict = if contains(&dish.allergens, allergen) {
    if contains(&dish.removable_allergens, allergen) {
      Verdict::CanBeRemoved
    } else {
      Verdict::Contains
    }
  } else if contains(&dish.cross_contact_allergens, allergen) {
    Verdict::CrossContactRisk
  } else {
    Verdict::FreeOf
  };
  let label = match verdict {
    Verdict::Contains => format!("Contains {allergen}"),
    Verdict::CanBeRemoved => format!("Can be made {allergen}-free"),
    Verdict::CrossContactRisk => format!("Cross-contact risk: {allergen}"),
    _ => format!("Doesn't contain {allergen}"),
  };
  Row { subject: allergen.to_string(), verdict, label }
}

fn diet_row(dish: &Dish, diet: &str, conflicts: &DietConflicts) -> Row {
  let verdict = if contains(&dish.diets, diet) {
    if contains(&dish.cross_contact_diets, diet) {
      Verdict::CrossContactRisk
    } else {
      Verdict::Meets
    }
  } else {
    let blocking = conflicts.blocking(diet, dish);
    if !blocking.is_empty() && blocking.iter().all(|a| contains(&dish.removable_allergens, a)) {
      Verdict::CanBeMade
    } else {
      Verdict::NotCompatible
    }
  };
  let label = match verdict {
    Verdict::Meets => format!("Meets {diet}"),
    Verdict::CanBeMade => format!("Can be made {diet}"),
    Verdict::CrossContactRisk => format!("Cross-contact risk: {diet}"),
    _ => format!("Not {diet}"),
  };
  Row { subject: diet.to_string(), verdict, label }
}

fn norm(s: &str) -> String { s.trim().to_lowercase() }

fn contains(list: &[String], needle: &str) -> bool {
  let needle = norm(needle);
  list.iter().any(|item| norm(item) == needle)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn menu() -> Menu {
    [
      Dish {
        name: "Pad Thai".into(),
        allergens: vec!["Peanut".into(), "Egg".into()],
        removable_allergens: vec!["peanut".into()],
        cross_contact_allergens: vec!["sesame".into()],
        ..Dish::default()
      },
      Dish {
        name: "Green Salad".into(),
        diets: vec!["vegan".into(), "gluten-free".into()],
        cross_contact_diets: vec!["gluten-free".into()],
        ..Dish::default()
      },
      Dish {
        name: "Caesar".into(),
        allergens: vec!["egg".into(), "milk".into()],
        removable_allergens: vec!["egg".into(), "milk".into()],
        ..Dish::default()
      },
    ]
    .into_iter()
    .collect()
  }

  fn conflicts() -> DietConflicts { DietConflicts::new([("vegan", vec!["milk", "egg"])]) }

  fn strings(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

  #[test]
  fn allergen_rows_cover_each_verdict() {
    let result = assess(
      "pad thai",
      &menu(),
      &strings(&["peanut", "egg", "sesame", "shellfish"]),
      &[],
      &conflicts(),
    );
    let verdicts: Vec<_> = result.rows.iter().map(|r| r.verdict).collect();
    assert_eq!(
      verdicts,
      vec![
        Verdict::CanBeRemoved,
        Verdict::Contains,
        Verdict::CrossContactRisk,
        Verdict::FreeOf,
      ]
    );
    assert_eq!(result.rows[0].label, "Can be made peanut-free");
    assert_eq!(result.severity, Tone::Danger);
    assert_eq!(result.badge, "Cannot be accommodated");
  }

  #[test]
  fn diet_can_be_made_when_every_conflict_is_removable() {
    let result = assess("Caesar", &menu(), &[], &strings(&["vegan"]), &conflicts());
    assert_eq!(result.rows[0].verdict, Verdict::CanBeMade);
    assert_eq!(result.badge, "Can be removed/replaced");
  }

  #[test]
  fn diet_without_known_conflicts_is_not_compatible() {
    let result = assess("Pad Thai", &menu(), &[], &strings(&["keto"]), &conflicts());
    assert_eq!(result.rows[0].verdict, Verdict::NotCompatible);
    assert_eq!(result.rows[0].label, "Not keto");
  }

  #[test]
  fn meeting_diet_with_cross_contact_warns() {
    let result = assess(
      "Green Salad",
      &menu(),
      &[],
      &strings(&["vegan", "gluten-free"]),
      &conflicts(),
    );
    let verdicts: Vec<_> = result.rows.iter().map(|r| r.verdict).collect();
    assert_eq!(verdicts, vec![Verdict::Meets, Verdict::CrossContactRisk]);
    assert_eq!(result.severity, Tone::Warn);
  }

  #[test]
  fn no_preferences_and_unknown_dish() {
    let plain = assess("Green Salad", &menu(), &[], &[], &conflicts());
    assert_eq!(plain.badge, "No saved preferences");

    let unknown = assess("Mystery Stew", &menu(), &strings(&["peanut"]), &[], &conflicts());
    assert!(!unknown.known);
    assert_eq!(unknown.badge, "Check with staff");
  }

  #[test]
  fn clean_dish_meets_all_requirements() {
    let result = assess("Green Salad", &menu(), &strings(&["peanut"]), &strings(&["vegan"]), &conflicts());
    assert_eq!(result.severity, Tone::Success);
    assert_eq!(result.badge, "Meets all requirements");
  }
}
