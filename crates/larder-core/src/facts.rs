//! Product facts — the read-only input handed to the engine by a collaborator.
//!
//! Facts arrive exactly as they were persisted, which means they may be
//! inconsistent: a concurrent edit can leave `quantity_consumed` above
//! `quantity_bought`, and a hand-edited record may carry negative or
//! non-finite numbers. [`normalize`] is the single place where those values are
//! corrected, and every correction is kept as an [`Anomaly`] so it can be
//! surfaced instead of silently swallowed.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::ProductStatus;

// ─── ProductFacts ────────────────────────────────────────────────────────────

/// Quantity and date facts about one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFacts {
  /// Total units acquired.
  pub quantity_bought:   f64,
  /// Cumulative units used so far.
  #[serde(default)]
  pub quantity_consumed: f64,
  /// Opaque display label (`"pcs"`, `"g"`, `"l"`, ...); never interpreted.
  #[serde(default)]
  pub unit:              String,
  /// When tracking began.
  pub purchase_date:     NaiveDate,
  /// Last calendar day the product is usable; `None` means it never expires.
  #[serde(default)]
  pub expiration_date:   Option<NaiveDate>,
  /// Status last written by the collaborator. Advisory only: the engine never
  /// reads it, only [`crate::reconcile`] compares against it.
  #[serde(default, alias = "status")]
  pub persisted_status:  Option<ProductStatus>,
}

impl ProductFacts {
  /// Convenience constructor with no expiration and no persisted status.
  pub fn new(
    quantity_bought: f64,
    quantity_consumed: f64,
    unit: impl Into<String>,
    purchase_date: NaiveDate,
  ) -> Self {
    Self {
      quantity_bought,
      quantity_consumed,
      unit: unit.into(),
      purchase_date,
      expiration_date: None,
      persisted_status: None,
    }
  }

  pub fn with_expiration(mut self, expiration_date: NaiveDate) -> Self {
    self.expiration_date = Some(expiration_date);
    self
  }

  pub fn with_persisted_status(mut self, status: ProductStatus) -> Self {
    self.persisted_status = Some(status);
    self
  }
}

// ─── Anomalies ───────────────────────────────────────────────────────────────

/// An inconsistency found (and corrected) while normalising facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
  /// `quantity_bought` was NaN or infinite; treated as 0.
  NonFiniteBought,
  /// `quantity_consumed` was NaN or infinite; treated as 0.
  NonFiniteConsumed,
  /// `quantity_bought` was negative; treated as 0.
  NegativeBought { value: f64 },
  /// `quantity_consumed` was negative; treated as 0.
  NegativeConsumed { value: f64 },
  /// More was consumed than bought; remaining quantity is floored at 0.
  ConsumedExceedsBought { consumed: f64, bought: f64 },
  /// The product expires before it was purchased.
  ExpirationBeforePurchase {
    purchase_date:   NaiveDate,
    expiration_date: NaiveDate,
  },
  /// The purchase date lies in the future; elapsed time is treated as 0.
  PurchaseInFuture { days: i64 },
}

impl fmt::Display for Anomaly {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NonFiniteBought => {
        write!(f, "Purchased quantity is not a number. Treating as 0.")
      }
      Self::NonFiniteConsumed => {
        write!(f, "Consumed quantity is not a number. Treating as 0.")
      }
      Self::NegativeBought { value } => write!(
        f,
        "Purchased quantity cannot be negative ({value}). Treating as 0."
      ),
      Self::NegativeConsumed { value } => write!(
        f,
        "Consumed quantity cannot be negative ({value}). Treating as 0."
      ),
      Self::ConsumedExceedsBought { consumed, bought } => write!(
        f,
        "Consumed quantity ({consumed}) exceeds purchased quantity ({bought}). \
         Please correct the consumption record."
      ),
      Self::ExpirationBeforePurchase {
        purchase_date,
        expiration_date,
      } => write!(
        f,
        "Expiration date {expiration_date} is before purchase date \
         {purchase_date}."
      ),
      Self::PurchaseInFuture { days } => write!(
        f,
        "Purchase date is {days} day(s) in the future. Cannot calculate \
         consumption rate."
      ),
    }
  }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Facts after defensive normalisation. Quantities are finite and
/// non-negative; `remaining` is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
  pub bought:          f64,
  /// Finite and non-negative, but *not* clamped to `bought`.
  pub consumed:        f64,
  /// `max(0, bought - consumed)`.
  pub remaining:       f64,
  pub purchase_date:   NaiveDate,
  pub expiration_date: Option<NaiveDate>,
  /// Corrections applied, in detection order.
  pub anomalies:       Vec<Anomaly>,
}

impl Normalized {
  /// `consumed` clamped into `[0, bought]`, for percentage math.
  pub fn effective_consumed(&self) -> f64 { self.consumed.min(self.bought) }

  /// A product counts as finished only when something was bought and all of
  /// it has been used. A zero-quantity placeholder is never finished.
  pub fn is_finished(&self) -> bool {
    self.bought > 0.0 && self.consumed >= self.bought
  }

  /// Expired when the expiration day lies strictly before `today`.
  pub fn is_expired(&self, today: NaiveDate) -> bool {
    self.expiration_date.is_some_and(|date| date < today)
  }
}

/// Clamp non-finite and negative quantities to zero and record every
/// inconsistency found along the way.
pub fn normalize(facts: &ProductFacts, today: NaiveDate) -> Normalized {
  let mut anomalies = Vec::new();

  let bought = sanitize(
    facts.quantity_bought,
    &mut anomalies,
    Anomaly::NonFiniteBought,
    |value| Anomaly::NegativeBought { value },
  );
  let consumed = sanitize(
    facts.quantity_consumed,
    &mut anomalies,
    Anomaly::NonFiniteConsumed,
    |value| Anomaly::NegativeConsumed { value },
  );

  if consumed > bought {
    anomalies.push(Anomaly::ConsumedExceedsBought { consumed, bought });
  }

  if let Some(expiration_date) = facts.expiration_date
    && expiration_date < facts.purchase_date
  {
    anomalies.push(Anomaly::ExpirationBeforePurchase {
      purchase_date: facts.purchase_date,
      expiration_date,
    });
  }

  let ahead = (facts.purchase_date - today).num_days();
  if ahead > 0 {
    anomalies.push(Anomaly::PurchaseInFuture { days: ahead });
  }

  if !anomalies.is_empty() {
    tracing::debug!(count = anomalies.len(), "normalised inconsistent facts");
  }

  Normalized {
    bought,
    consumed,
    remaining: (bought - consumed).max(0.0),
    purchase_date: facts.purchase_date,
    expiration_date: facts.expiration_date,
    anomalies,
  }
}

fn sanitize(
  value: f64,
  anomalies: &mut Vec<Anomaly>,
  non_finite: Anomaly,
  negative: impl FnOnce(f64) -> Anomaly,
) -> f64 {
  if !value.is_finite() {
    anomalies.push(non_finite);
    0.0
  } else if value < 0.0 {
    anomalies.push(negative(value));
    0.0
  } else {
    value
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn clean_facts_have_no_anomalies() {
    let facts = ProductFacts::new(10.0, 4.0, "pcs", day(2026, 1, 1))
      .with_expiration(day(2026, 2, 1));
    let n = normalize(&facts, day(2026, 1, 10));
    assert!(n.anomalies.is_empty());
    assert_eq!(n.remaining, 6.0);
  }

  #[test]
  fn nan_and_negative_quantities_become_zero() {
    let facts = ProductFacts::new(f64::NAN, -3.0, "g", day(2026, 1, 1));
    let n = normalize(&facts, day(2026, 1, 1));
    assert_eq!(n.bought, 0.0);
    assert_eq!(n.consumed, 0.0);
    assert_eq!(n.anomalies, vec![
      Anomaly::NonFiniteBought,
      Anomaly::NegativeConsumed { value: -3.0 },
    ]);
  }

  #[test]
  fn overconsumption_is_recorded_not_clamped() {
    let facts = ProductFacts::new(100.0, 150.0, "ml", day(2026, 1, 1));
    let n = normalize(&facts, day(2026, 1, 5));
    assert_eq!(n.consumed, 150.0);
    assert_eq!(n.effective_consumed(), 100.0);
    assert_eq!(n.remaining, 0.0);
    assert!(matches!(
      n.anomalies.as_slice(),
      [Anomaly::ConsumedExceedsBought { .. }]
    ));
  }

  #[test]
  fn date_anomalies_are_detected_in_order() {
    let facts = ProductFacts::new(1.0, 0.0, "pcs", day(2026, 3, 10))
      .with_expiration(day(2026, 3, 1));
    let n = normalize(&facts, day(2026, 3, 7));
    assert_eq!(n.anomalies, vec![
      Anomaly::ExpirationBeforePurchase {
        purchase_date:   day(2026, 3, 10),
        expiration_date: day(2026, 3, 1),
      },
      Anomaly::PurchaseInFuture { days: 3 },
    ]);
  }

  #[test]
  fn zero_bought_is_never_finished() {
    let facts = ProductFacts::new(0.0, 0.0, "pcs", day(2026, 1, 1));
    assert!(!normalize(&facts, day(2026, 1, 1)).is_finished());
  }

  #[test]
  fn status_alias_deserialises_into_persisted_status() {
    let facts: ProductFacts = serde_json::from_str(
      r#"{
        "quantity_bought": 2,
        "purchase_date": "2026-01-01",
        "status": "EXPIRED"
      }"#,
    )
    .unwrap();
    assert_eq!(facts.persisted_status, Some(ProductStatus::Expired));
    assert_eq!(facts.quantity_consumed, 0.0);
    assert_eq!(facts.expiration_date, None);
  }
}
