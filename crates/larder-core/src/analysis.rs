//! The consumption analysis engine.
//!
//! [`analyze`] turns one product's facts into a [`ProductAnalysis`]: remaining
//! quantity, consumption pace, the pace needed to finish before expiration, a
//! projected finish date, a status suggestion, and advisory warnings. It is a
//! pure function of its inputs; the caller supplies the current day.
//!
//! Every quantity that cannot be computed is `None` rather than zero, NaN, or
//! infinity. In particular, projections collapse to `None` as soon as the
//! product reaches a terminal status.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  config::AnalysisConfig,
  facts::{Normalized, ProductFacts, normalize},
  notify::{NotificationFrequency, frequency_of},
  status::{ProductStatus, status_of},
  warning::{self, Warning},
};

// ─── Output ──────────────────────────────────────────────────────────────────

/// The derived view of a product as of one calendar day — never stored by the
/// engine, always recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
  /// The day this analysis was computed for.
  pub as_of:                             NaiveDate,
  /// `max(0, bought - consumed)`.
  pub remaining_quantity:                f64,
  /// In `[0, 100]`, even when more was consumed than bought.
  pub percent_consumed:                  f64,
  pub percent_remaining:                 f64,
  /// Negative once the expiration day has passed; `None` if the product
  /// never expires.
  pub days_until_expiration:             Option<i64>,
  pub months_until_expiration:           Option<i64>,
  pub years_until_expiration:            Option<i64>,
  pub is_expired:                        bool,
  /// Whole days elapsed since purchase, never negative.
  pub days_since_purchase:               i64,
  /// Average units per day since purchase. `None` when no time has elapsed
  /// or nothing has been consumed yet.
  pub current_avg_daily_consumption:     Option<f64>,
  /// Units per day needed to finish exactly on the expiration day.
  pub recommended_daily_to_finish:       Option<f64>,
  pub recommended_monthly_to_finish:     Option<f64>,
  /// When the product runs out at the current pace.
  pub estimated_finish_date:             Option<NaiveDate>,
  pub estimated_days_to_finish_from_now: Option<i64>,
  pub status_suggestion:                 ProductStatus,
  pub notification_frequency:            NotificationFrequency,
  /// One-line human-readable summary.
  pub summary:                           String,
  pub warnings:                          Vec<Warning>,
}

impl ProductAnalysis {
  /// The warnings as display strings, in emission order.
  pub fn warning_messages(&self) -> Vec<String> {
    self.warnings.iter().map(ToString::to_string).collect()
  }

  /// Whether any warning reports inconsistent input facts.
  pub fn has_data_integrity_warning(&self) -> bool {
    self.warnings.iter().any(Warning::is_data_integrity)
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Analyse `facts` as of `today` with the default thresholds.
pub fn analyze(facts: &ProductFacts, today: NaiveDate) -> ProductAnalysis {
  analyze_with(facts, today, &AnalysisConfig::default())
}

/// Analyse `facts` as of `today`.
///
/// Never fails: malformed input is normalised and reported through
/// [`Warning::Inconsistent`].
pub fn analyze_with(
  facts: &ProductFacts,
  today: NaiveDate,
  config: &AnalysisConfig,
) -> ProductAnalysis {
  let n = normalize(facts, today);
  let status = status_of(&n, today);

  let percent_consumed = percent_consumed(&n);
  let days_until_expiration =
    n.expiration_date.map(|date| (date - today).num_days());
  let months_until_expiration =
    n.expiration_date.map(|date| whole_months_between(today, date));
  let days_since_purchase = (today - n.purchase_date).num_days().max(0);

  let current = current_pace(&n, days_since_purchase);
  let recommended = recommended_pace(&n, status, days_until_expiration);
  let recommended_monthly = recommended
    .zip(months_until_expiration)
    .filter(|&(_, months)| months > 0)
    .map(|(_, months)| round_to(n.remaining / months as f64, 6));
  let projection = project_finish(&n, status, days_since_purchase, today);

  let mut analysis = ProductAnalysis {
    as_of: today,
    remaining_quantity: round_to(n.remaining, 4),
    percent_consumed,
    percent_remaining: round_to(100.0 - percent_consumed, 2),
    days_until_expiration,
    months_until_expiration,
    years_until_expiration: months_until_expiration.map(|m| m / 12),
    is_expired: n.is_expired(today),
    days_since_purchase,
    current_avg_daily_consumption: current,
    recommended_daily_to_finish: recommended,
    recommended_monthly_to_finish: recommended_monthly,
    estimated_finish_date: projection.map(|(date, _)| date),
    estimated_days_to_finish_from_now: projection.map(|(_, days)| days),
    status_suggestion: status,
    notification_frequency: frequency_of(&n, today),
    summary: summarize(
      &n,
      &facts.unit,
      percent_consumed,
      status,
      days_until_expiration,
    ),
    warnings: Vec::new(),
  };
  analysis.warnings = warning::generate(&analysis, &n.anomalies, config);

  tracing::debug!(
    %today,
    status = %analysis.status_suggestion,
    warnings = analysis.warnings.len(),
    "analysed product"
  );
  analysis
}

// ─── Rates and projection ────────────────────────────────────────────────────

fn percent_consumed(n: &Normalized) -> f64 {
  if n.bought <= 0.0 {
    return 0.0;
  }
  let percent = (n.effective_consumed() / n.bought * 100.0).clamp(0.0, 100.0);
  round_to(percent, 2)
}

fn current_pace(n: &Normalized, days_since_purchase: i64) -> Option<f64> {
  if days_since_purchase <= 0 || n.consumed <= 0.0 {
    return None;
  }
  Some(round_to(n.consumed / days_since_purchase as f64, 6))
}

fn recommended_pace(
  n: &Normalized,
  status: ProductStatus,
  days_until_expiration: Option<i64>,
) -> Option<f64> {
  if status.is_terminal() {
    return None;
  }
  let days = days_until_expiration.filter(|&days| days > 0)?;
  Some(round_to(n.remaining / days as f64, 6))
}

/// Projected finish date and days from `today`, extrapolating the average
/// pace since purchase.
fn project_finish(
  n: &Normalized,
  status: ProductStatus,
  days_since_purchase: i64,
  today: NaiveDate,
) -> Option<(NaiveDate, i64)> {
  if status.is_terminal()
    || days_since_purchase <= 0
    || n.consumed <= 0.0
    || n.remaining <= 0.0
  {
    return None;
  }
  // remaining / (consumed / elapsed), rearranged to keep exact ratios exact.
  let days = (n.remaining * days_since_purchase as f64 / n.consumed).ceil();
  if !days.is_finite() || days > i64::MAX as f64 {
    return None;
  }
  let days = days as i64;
  let date = today.checked_add_days(Days::new(u64::try_from(days).ok()?))?;
  Some((date, days))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Round half away from zero to `places` decimal places.
///
/// Values too large to scale are returned unchanged; at that magnitude they
/// carry no fractional digits anyway.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
  if !value.is_finite() {
    return value;
  }
  let factor = 10f64.powi(places);
  let scaled = value * factor;
  if !scaled.is_finite() {
    return value;
  }
  scaled.round() / factor
}

/// Whole calendar months from `from` to `to`, truncated toward zero.
/// Jan 31 → Feb 28 is zero months; Jan 15 → Mar 15 is two.
pub(crate) fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
  let mut months = i64::from(to.year() - from.year()) * 12
    + i64::from(to.month()) - i64::from(from.month());
  if months > 0 && to.day() < from.day() {
    months -= 1;
  } else if months < 0 && to.day() > from.day() {
    months += 1;
  }
  months
}

fn summarize(
  n: &Normalized,
  unit: &str,
  percent_consumed: f64,
  status: ProductStatus,
  days_until_expiration: Option<i64>,
) -> String {
  let qty = |value: f64| {
    let value = round_to(value, 2);
    if unit.is_empty() { value.to_string() } else { format!("{value} {unit}") }
  };
  let expiry = match days_until_expiration {
    None => "No expiration date".to_owned(),
    Some(days) if days < -1 => format!("Expired {} days ago", -days),
    Some(-1) => "Expired 1 day ago".to_owned(),
    Some(0) => "Expires TODAY".to_owned(),
    Some(1) => "Expires in 1 day".to_owned(),
    Some(days) => format!("Expires in {days} days"),
  };
  format!(
    "Bought: {} | Consumed: {} ({}%) | Remaining: {} | {expiry} | Status: {status}",
    qty(n.bought),
    qty(n.consumed),
    round_to(percent_consumed, 1),
    qty(n.remaining),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn rounds_half_away_from_zero() {
    assert_eq!(round_to(40.000000000000007, 2), 40.0);
    assert_eq!(round_to(0.125, 2), 0.13);
    assert_eq!(round_to(-0.125, 2), -0.13);
    assert_eq!(round_to(8.0 / 30.0, 6), 0.266667);
  }

  #[test]
  fn rounding_huge_values_stays_finite() {
    assert_eq!(round_to(1e305, 4), 1e305);
    assert_eq!(round_to(f64::MAX, 6), f64::MAX);
    assert_eq!(round_to(-f64::MAX, 2), -f64::MAX);
  }

  #[test]
  fn months_truncate_toward_zero() {
    assert_eq!(whole_months_between(day(2026, 1, 31), day(2026, 2, 28)), 0);
    assert_eq!(whole_months_between(day(2026, 1, 15), day(2026, 3, 15)), 2);
    assert_eq!(whole_months_between(day(2026, 1, 15), day(2027, 1, 14)), 11);
    assert_eq!(whole_months_between(day(2026, 3, 15), day(2026, 1, 16)), -1);
    assert_eq!(whole_months_between(day(2026, 3, 15), day(2026, 1, 15)), -2);
  }

  #[test]
  fn monthly_recommendation_needs_a_whole_month() {
    let today = day(2026, 1, 10);
    let facts = ProductFacts::new(30.0, 0.0, "g", today)
      .with_expiration(day(2026, 2, 5));
    let a = analyze(&facts, today);
    assert_eq!(a.months_until_expiration, Some(0));
    assert!(a.recommended_daily_to_finish.is_some());
    assert_eq!(a.recommended_monthly_to_finish, None);

    let facts = ProductFacts::new(30.0, 0.0, "g", today)
      .with_expiration(day(2026, 4, 10));
    let a = analyze(&facts, today);
    assert_eq!(a.months_until_expiration, Some(3));
    assert_eq!(a.years_until_expiration, Some(0));
    assert_eq!(a.recommended_monthly_to_finish, Some(10.0));
  }

  #[test]
  fn summary_mentions_quantities_and_status() {
    let today = day(2026, 1, 11);
    let facts = ProductFacts::new(10.0, 4.0, "pcs", day(2026, 1, 1))
      .with_expiration(day(2026, 1, 16));
    assert_eq!(
      analyze(&facts, today).summary,
      "Bought: 10 pcs | Consumed: 4 pcs (40%) | Remaining: 6 pcs | Expires \
       in 5 days | Status: AVAILABLE"
    );
  }

  #[test]
  fn summary_without_unit_or_expiration() {
    let today = day(2026, 1, 1);
    let facts = ProductFacts::new(2.5, 0.0, "", today);
    assert_eq!(
      analyze(&facts, today).summary,
      "Bought: 2.5 | Consumed: 0 (0%) | Remaining: 2.5 | No expiration date \
       | Status: AVAILABLE"
    );
  }

  #[test]
  fn finish_date_overflow_yields_none() {
    let today = day(2026, 1, 2);
    let facts = ProductFacts::new(1e300, 1e-300, "g", day(2026, 1, 1));
    let a = analyze(&facts, today);
    assert!(a.current_avg_daily_consumption.is_none_or(|p| p >= 0.0));
    assert_eq!(a.estimated_finish_date, None);
    assert_eq!(a.estimated_days_to_finish_from_now, None);
  }
}
