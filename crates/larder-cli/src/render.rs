//! Plain-text rendering of analyses and reconciliation reports.
//!
//! All number formatting lives here; the engine hands over raw values.

use std::fmt;

use larder_core::{ProductAnalysis, reconcile::Reconciliation};

use crate::inventory::Product;

/// Placeholder for values the engine could not compute.
const MISSING: &str = "—";

/// Format with roughly `sig_digits` significant digits, never more than six
/// decimals and never in scientific notation.
pub fn significant(value: f64, sig_digits: i32) -> String {
  if !value.is_finite() {
    return MISSING.to_owned();
  }
  if value == 0.0 {
    return format!("{:.*}", sig_digits.max(2) as usize, 0.0);
  }
  let abs = value.abs();
  let digits_before = if abs >= 1.0 {
    abs.log10().floor() as i32 + 1
  } else {
    0
  };
  let decimals = (sig_digits - digits_before).clamp(0, 6) as usize;
  format!("{value:.decimals$}")
}

/// A quantity followed by its unit label, e.g. `0.40 pcs`.
pub fn quantity(value: f64, unit: &str) -> String {
  let number = significant(value, 2);
  if unit.is_empty() { number } else { format!("{number} {unit}") }
}

fn rate(value: Option<f64>, unit: &str) -> String {
  value.map_or_else(
    || MISSING.to_owned(),
    |v| format!("{}/day", quantity(v, unit)),
  )
}

fn percent(value: f64) -> String { format!("{}%", significant(value, 2)) }

/// One product's analysis as an indented text block.
pub struct AnalysisBlock<'a> {
  pub product:  &'a Product,
  pub analysis: &'a ProductAnalysis,
}

impl fmt::Display for AnalysisBlock<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (product, a) = (self.product, self.analysis);
    let unit = product.facts.unit.as_str();

    if product.name.is_empty() {
      writeln!(f, "{}", product.id)?;
    } else {
      writeln!(f, "{} ({})", product.name, product.id)?;
    }
    writeln!(f, "  status     {}", a.status_suggestion)?;
    writeln!(
      f,
      "  remaining  {} ({} left)",
      quantity(a.remaining_quantity, unit),
      percent(a.percent_remaining)
    )?;

    let expiration = product.facts.expiration_date;
    let expires = match (expiration, a.days_until_expiration) {
      (Some(date), Some(days)) if days < 0 => {
        format!("{date} ({} days ago)", -days)
      }
      (Some(date), Some(0)) => format!("{date} (today)"),
      (Some(date), Some(days)) => format!("{date} (in {days} days)"),
      _ => "never".to_owned(),
    };
    writeln!(f, "  expires    {expires}")?;
    writeln!(
      f,
      "  pace       {} (recommended {})",
      rate(a.current_avg_daily_consumption, unit),
      rate(a.recommended_daily_to_finish, unit)
    )?;

    let projected = a.estimated_days_to_finish_from_now;
    let finish = match (a.estimated_finish_date, projected) {
      (Some(date), Some(days)) => format!("{date} (in {days} days)"),
      _ => MISSING.to_owned(),
    };
    writeln!(f, "  finish by  {finish}")?;
    writeln!(f, "  reminders  {}", a.notification_frequency)?;

    for warning in &a.warnings {
      writeln!(f, "  ! {warning}")?;
    }
    Ok(())
  }
}

/// Render one product's analysis as an indented block.
pub fn analysis(product: &Product, analysis: &ProductAnalysis) -> String {
  AnalysisBlock { product, analysis }.to_string()
}

/// The stale entries of a reconciliation followed by a one-line tally.
pub struct ReconciliationReport<'a, 'k>(pub &'a Reconciliation<&'k str>);

impl fmt::Display for ReconciliationReport<'_, '_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let r = self.0;
    for report in r.changed() {
      let persisted = report
        .persisted
        .map_or_else(|| "(unset)".to_owned(), |s| s.to_string());
      writeln!(f, "{}: {persisted} -> {}", report.id, report.derived)?;
    }
    writeln!(
      f,
      "{} of {} product statuses are stale as of {}",
      r.changed_count(),
      r.reports.len(),
      r.as_of
    )
  }
}

/// Render the stale entries of a reconciliation and a one-line tally.
pub fn reconciliation(r: &Reconciliation<&str>) -> String {
  ReconciliationReport(r).to_string()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use larder_core::{ProductFacts, ProductStatus, analyze, reconcile::reconcile};

  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn significant_digits() {
    assert_eq!(significant(0.0, 2), "0.00");
    assert_eq!(significant(0.4, 2), "0.40");
    assert_eq!(significant(6.0, 2), "6.0");
    assert_eq!(significant(1.2, 2), "1.2");
    assert_eq!(significant(150.0, 2), "150");
    assert_eq!(significant(8.0 / 30.0, 2), "0.27");
    assert_eq!(significant(0.0000001, 2), "0.00");
    assert_eq!(significant(-2.5, 2), "-2.5");
    assert_eq!(significant(f64::NAN, 2), "—");
  }

  #[test]
  fn quantity_appends_unit() {
    assert_eq!(quantity(6.0, "pcs"), "6.0 pcs");
    assert_eq!(quantity(6.0, ""), "6.0");
  }

  #[test]
  fn renders_analysis_block() {
    let product = Product {
      id:    "eggs".into(),
      name:  "Eggs".into(),
      facts: ProductFacts::new(10.0, 4.0, "pcs", day(2026, 10, 6))
        .with_expiration(day(2026, 10, 21)),
    };
    let a = analyze(&product.facts, day(2026, 10, 16));
    let text = analysis(&product, &a);

    assert!(text.starts_with("Eggs (eggs)\n"));
    assert!(text.contains("  status     AVAILABLE\n"));
    assert!(text.contains("  remaining  6.0 pcs (60% left)\n"));
    assert!(text.contains("  expires    2026-10-21 (in 5 days)\n"));
    assert!(
      text.contains("  pace       0.40 pcs/day (recommended 1.2 pcs/day)\n")
    );
    assert!(text.contains("  finish by  2026-10-31 (in 15 days)\n"));
    assert!(text.contains("  ! Current pace (0.4/day) is below recommended"));
  }

  #[test]
  fn renders_reconciliation_tally() {
    let fresh = ProductFacts::new(1.0, 0.0, "pcs", day(2026, 10, 1))
      .with_persisted_status(ProductStatus::Available);
    let stale = ProductFacts::new(1.0, 1.0, "pcs", day(2026, 10, 1))
      .with_persisted_status(ProductStatus::Available);
    let r = reconcile([("a", &fresh), ("b", &stale)], day(2026, 10, 16));

    assert_eq!(
      reconciliation(&r),
      "b: AVAILABLE -> FINISHED\n1 of 2 product statuses are stale as of \
       2026-10-16\n"
    );
  }

  #[test]
  fn renders_unset_status_and_display_matches_helper() {
    let unset = ProductFacts::new(1.0, 0.0, "pcs", day(2026, 10, 1));
    let r = reconcile([("c", &unset)], day(2026, 10, 16));
    let text = reconciliation(&r);
    assert!(text.starts_with("c: (unset) -> AVAILABLE\n"));
    assert_eq!(text, ReconciliationReport(&r).to_string());
  }

  #[test]
  fn analysis_block_without_name_uses_id() {
    let product = Product {
      id:    "oats".into(),
      name:  String::new(),
      facts: ProductFacts::new(1000.0, 0.0, "g", day(2026, 10, 16)),
    };
    let a = analyze(&product.facts, day(2026, 10, 16));
    let text = AnalysisBlock {
      product:  &product,
      analysis: &a,
    }
    .to_string();
    assert!(text.starts_with("oats\n"));
    assert!(text.contains("  expires    never\n"));
    assert!(text.contains("  finish by  —\n"));
    assert!(text.ends_with(
      "  ! No expiration date set. Expiration-related metrics unavailable.\n"
    ));
  }
}
