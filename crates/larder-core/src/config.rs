//! Tunable thresholds for the warning generator.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Thresholds consulted when deciding which warnings to emit.
///
/// Every field has a default, so a partial TOML table or a handful of
/// environment variables is enough to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
  /// Days before expiration at which an unfinished product becomes urgent.
  pub urgent_horizon_days:      i64,
  /// Days before expiration at which a softer "expiring soon" note starts.
  /// Must not be below `urgent_horizon_days`.
  pub soon_horizon_days:        i64,
  /// Current pace above `fast_pace_ratio × recommended` is flagged as
  /// unusually fast.
  pub fast_pace_ratio:          f64,
  /// Days an untouched product may sit before a "not started" nudge.
  pub idle_grace_days:          i64,
  /// A projected finish more than this many days before expiration earns a
  /// "well ahead" note.
  pub early_finish_margin_days: i64,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      urgent_horizon_days:      3,
      soon_horizon_days:        7,
      fast_pace_ratio:          1.5,
      idle_grace_days:          2,
      early_finish_margin_days: 7,
    }
  }
}

impl AnalysisConfig {
  /// Reject thresholds that would make the warning rules meaningless.
  pub fn validate(&self) -> Result<()> {
    if self.urgent_horizon_days < 0 {
      return Err(Error::InvalidConfig(format!(
        "urgent_horizon_days must be >= 0, got {}",
        self.urgent_horizon_days
      )));
    }
    if self.soon_horizon_days < self.urgent_horizon_days {
      return Err(Error::InvalidConfig(format!(
        "soon_horizon_days ({}) must be >= urgent_horizon_days ({})",
        self.soon_horizon_days, self.urgent_horizon_days
      )));
    }
    if !self.fast_pace_ratio.is_finite() || self.fast_pace_ratio <= 1.0 {
      return Err(Error::InvalidConfig(format!(
        "fast_pace_ratio must be a finite number > 1, got {}",
        self.fast_pace_ratio
      )));
    }
    if self.idle_grace_days < 0 {
      return Err(Error::InvalidConfig(format!(
        "idle_grace_days must be >= 0, got {}",
        self.idle_grace_days
      )));
    }
    if self.early_finish_margin_days < 0 {
      return Err(Error::InvalidConfig(format!(
        "early_finish_margin_days must be >= 0, got {}",
        self.early_finish_margin_days
      )));
    }
    Ok(())
  }
}
