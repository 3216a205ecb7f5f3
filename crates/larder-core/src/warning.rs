//! Advisory warnings derived from an analysis.
//!
//! Warnings are a projection over fields the engine has already computed;
//! they never re-derive anything. Each rule is evaluated on its own, so any
//! combination may fire, and they are always emitted in the same order:
//!
//! 1. expiration urgency
//! 2. pace below the recommendation
//! 3. pace far above the recommendation
//! 4. data-integrity problems found during normalisation
//! 5. nothing consumed yet
//! 6. expiring within the softer "soon" horizon
//! 7. projected finish after the expiration day
//! 8. projected finish well before the expiration day
//! 9. pace on track
//! 10. no expiration date

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  analysis::{ProductAnalysis, round_to},
  config::AnalysisConfig,
  facts::Anomaly,
};

/// A single advisory message. `Display` renders the user-facing text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Warning {
  /// Unfinished product whose expiration day is close.
  ExpiringSoon { days: i64 },
  /// Unfinished product already past its expiration day.
  ExpiredWithRemaining { remaining: f64 },
  /// At the current pace the product will not be finished in time.
  BelowRecommendedPace { current: f64, recommended: f64 },
  /// Consumption is far faster than needed; possibly a data-entry slip.
  AboveRecommendedPace { current: f64, recommended: f64 },
  /// The input facts were inconsistent and had to be corrected.
  Inconsistent(Anomaly),
  /// Several days have passed and nothing has been used yet.
  NotStarted { recommended: f64 },
  /// Unfinished product expiring within the week, but not yet urgent.
  ExpiringThisWeek { days: i64 },
  /// The projected finish date falls after the expiration day.
  FinishAfterExpiration { days_late: i64 },
  /// The projected finish date is comfortably before the expiration day.
  FinishBeforeExpiration { days_early: i64 },
  /// Current pace is at or above the recommendation without being unusual.
  OnTrack,
  /// Expiration-derived metrics are unavailable.
  NoExpiration,
}

impl Warning {
  /// Whether this warning reports a data-integrity problem.
  pub fn is_data_integrity(&self) -> bool {
    matches!(self, Self::Inconsistent(_))
  }
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ExpiringSoon { days: 0 } => write!(f, "URGENT: Expires today!"),
      Self::ExpiringSoon { days: 1 } => {
        write!(f, "URGENT: Only 1 day until expiration!")
      }
      Self::ExpiringSoon { days } => {
        write!(f, "URGENT: Only {days} days until expiration!")
      }
      Self::ExpiredWithRemaining { remaining } => write!(
        f,
        "This product has expired with {} units remaining. Consider \
         discarding it.",
        round_to(*remaining, 2)
      ),
      Self::BelowRecommendedPace {
        current,
        recommended,
      } => write!(
        f,
        "Current pace ({}/day) is below recommended ({}/day). Increase usage \
         to finish before expiration.",
        round_to(*current, 2),
        round_to(*recommended, 2)
      ),
      Self::AboveRecommendedPace {
        current,
        recommended,
      } => write!(
        f,
        "Current pace ({}/day) is much faster than needed ({}/day). Check \
         the consumption record, or slow down.",
        round_to(*current, 2),
        round_to(*recommended, 2)
      ),
      Self::Inconsistent(anomaly) => write!(f, "{anomaly}"),
      Self::NotStarted { recommended } => write!(
        f,
        "Haven't started consuming yet. Begin using {} units per day to \
         finish before expiration.",
        round_to(*recommended, 2)
      ),
      Self::ExpiringThisWeek { days } => {
        write!(f, "Expiring soon: {days} days left.")
      }
      Self::FinishAfterExpiration { days_late } => write!(
        f,
        "At current pace, you'll finish {days_late} day(s) AFTER expiration. \
         Increase consumption to finish on time."
      ),
      Self::FinishBeforeExpiration { days_early } => write!(
        f,
        "At current pace, you'll finish {days_early} days before \
         expiration. Well done!"
      ),
      Self::OnTrack => write!(
        f,
        "You're on track! Current pace will finish the product before \
         expiration."
      ),
      Self::NoExpiration => write!(
        f,
        "No expiration date set. Expiration-related metrics unavailable."
      ),
    }
  }
}

/// Produce the ordered warnings for an analysis whose other fields are
/// already populated.
pub fn generate(
  analysis: &ProductAnalysis,
  anomalies: &[Anomaly],
  config: &AnalysisConfig,
) -> Vec<Warning> {
  let mut warnings = Vec::new();
  warnings.extend(urgency(analysis, config));
  warnings.extend(below_pace(analysis));
  warnings.extend(above_pace(analysis, config));
  warnings.extend(anomalies.iter().cloned().map(Warning::Inconsistent));
  warnings.extend(not_started(analysis, config));
  warnings.extend(expiring_this_week(analysis, config));
  warnings.extend(finish_after_expiration(analysis));
  warnings.extend(finish_before_expiration(analysis, config));
  warnings.extend(on_track(analysis, config));
  warnings.extend(no_expiration(analysis));
  warnings
}

fn urgency(a: &ProductAnalysis, config: &AnalysisConfig) -> Option<Warning> {
  let days = a.days_until_expiration?;
  if a.status_suggestion.is_finished()
    || a.remaining_quantity <= 0.0
    || days > config.urgent_horizon_days
  {
    return None;
  }
  Some(if days < 0 {
    Warning::ExpiredWithRemaining {
      remaining: a.remaining_quantity,
    }
  } else {
    Warning::ExpiringSoon { days }
  })
}

/// The current and recommended paces, when both are defined and the product
/// can still be acted on.
fn paces(a: &ProductAnalysis) -> Option<(f64, f64)> {
  if a.status_suggestion.is_terminal() {
    return None;
  }
  let current = a.current_avg_daily_consumption?;
  let recommended = a.recommended_daily_to_finish?;
  (recommended > 0.0).then_some((current, recommended))
}

fn below_pace(a: &ProductAnalysis) -> Option<Warning> {
  let (current, recommended) = paces(a)?;
  (current < recommended).then_some(Warning::BelowRecommendedPace {
    current,
    recommended,
  })
}

fn above_pace(
  a: &ProductAnalysis,
  config: &AnalysisConfig,
) -> Option<Warning> {
  let (current, recommended) = paces(a)?;
  (current > config.fast_pace_ratio * recommended).then_some(
    Warning::AboveRecommendedPace {
      current,
      recommended,
    },
  )
}

fn not_started(
  a: &ProductAnalysis,
  config: &AnalysisConfig,
) -> Option<Warning> {
  if a.status_suggestion.is_terminal()
    || a.current_avg_daily_consumption.is_some()
    || a.days_since_purchase <= config.idle_grace_days
  {
    return None;
  }
  let recommended = a.recommended_daily_to_finish?;
  (recommended > 0.0).then_some(Warning::NotStarted { recommended })
}

fn expiring_this_week(
  a: &ProductAnalysis,
  config: &AnalysisConfig,
) -> Option<Warning> {
  let days = a.days_until_expiration?;
  if a.status_suggestion.is_finished()
    || a.remaining_quantity <= 0.0
    || days <= config.urgent_horizon_days
    || days > config.soon_horizon_days
  {
    return None;
  }
  Some(Warning::ExpiringThisWeek { days })
}

/// Projected finish minus expiration, in days; positive means late.
fn finish_vs_expiration(a: &ProductAnalysis) -> Option<i64> {
  let finish = a.estimated_days_to_finish_from_now?;
  let expires = a.days_until_expiration?;
  finish.checked_sub(expires)
}

fn finish_after_expiration(a: &ProductAnalysis) -> Option<Warning> {
  let days_late = finish_vs_expiration(a)?;
  (days_late > 0).then_some(Warning::FinishAfterExpiration { days_late })
}

fn finish_before_expiration(
  a: &ProductAnalysis,
  config: &AnalysisConfig,
) -> Option<Warning> {
  if a.is_expired {
    return None;
  }
  let days_early = finish_vs_expiration(a)?.checked_neg()?;
  (days_early > config.early_finish_margin_days)
    .then_some(Warning::FinishBeforeExpiration { days_early })
}

fn on_track(a: &ProductAnalysis, config: &AnalysisConfig) -> Option<Warning> {
  let (current, recommended) = paces(a)?;
  (current >= recommended && current <= config.fast_pace_ratio * recommended)
    .then_some(Warning::OnTrack)
}

fn no_expiration(a: &ProductAnalysis) -> Option<Warning> {
  (a.days_until_expiration.is_none() && !a.status_suggestion.is_terminal())
    .then_some(Warning::NoExpiration)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn urgency_text_reads_naturally() {
    let texts: Vec<_> = [0, 1, 3]
      .map(|days| Warning::ExpiringSoon { days }.to_string())
      .into();
    assert_eq!(texts, vec![
      "URGENT: Expires today!",
      "URGENT: Only 1 day until expiration!",
      "URGENT: Only 3 days until expiration!",
    ]);
  }

  #[test]
  fn inconsistent_delegates_to_anomaly_text() {
    let w = Warning::Inconsistent(Anomaly::PurchaseInFuture { days: 2 });
    assert!(w.is_data_integrity());
    assert!(w.to_string().starts_with("Purchase date is 2 day(s) in the future"));
  }

  #[test]
  fn serialises_with_kind_and_detail() {
    let json = serde_json::to_value(Warning::NotStarted { recommended: 1.5 })
      .unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "kind": "not_started", "detail": { "recommended": 1.5 } })
    );
  }
}
