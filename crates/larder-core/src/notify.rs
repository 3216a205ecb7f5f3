//! Reminder cadence suggestion.
//!
//! A small heuristic: the closer a product is to expiring, or the less of it
//! is left, the more often its owner should hear about it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::facts::{Normalized, ProductFacts, normalize};

/// How often to send reminders about a product.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum NotificationFrequency {
  Never,
  Daily,
  Weekly,
  Monthly,
  /// Selectable by users; never suggested.
  Quarterly,
}

/// Remaining quantity at or below which reminders become daily.
const LOW_STOCK_UNITS: f64 = 2.0;

/// Suggest a reminder cadence for `facts` as of `today`.
pub fn suggest_frequency(
  facts: &ProductFacts,
  today: NaiveDate,
) -> NotificationFrequency {
  frequency_of(&normalize(facts, today), today)
}

pub(crate) fn frequency_of(
  n: &Normalized,
  today: NaiveDate,
) -> NotificationFrequency {
  let Some(expiration_date) = n.expiration_date else {
    return NotificationFrequency::Monthly;
  };
  let days_to_expiry = (expiration_date - today).num_days();

  if days_to_expiry <= 0 {
    NotificationFrequency::Never
  } else if n.remaining <= LOW_STOCK_UNITS || days_to_expiry <= 7 {
    NotificationFrequency::Daily
  } else if days_to_expiry <= 30 {
    NotificationFrequency::Weekly
  } else {
    NotificationFrequency::Monthly
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn facts(remaining: f64, expires: Option<NaiveDate>) -> ProductFacts {
    let mut f = ProductFacts::new(remaining, 0.0, "pcs", day(2026, 1, 1));
    f.expiration_date = expires;
    f
  }

  #[test]
  fn cadence_tightens_as_expiry_approaches() {
    let today = day(2026, 1, 1);
    let cases = [
      (None, NotificationFrequency::Monthly),
      (Some(day(2026, 1, 1)), NotificationFrequency::Never),
      (Some(day(2025, 12, 20)), NotificationFrequency::Never),
      (Some(day(2026, 1, 8)), NotificationFrequency::Daily),
      (Some(day(2026, 1, 31)), NotificationFrequency::Weekly),
      (Some(day(2026, 3, 1)), NotificationFrequency::Monthly),
    ];
    for (expires, expected) in cases {
      assert_eq!(
        suggest_frequency(&facts(10.0, expires), today),
        expected,
        "expires {expires:?}"
      );
    }
  }

  #[test]
  fn low_stock_is_daily_even_far_from_expiry() {
    assert_eq!(
      suggest_frequency(&facts(2.0, Some(day(2026, 6, 1))), day(2026, 1, 1)),
      NotificationFrequency::Daily
    );
  }
}
