//! Product lifecycle status — a pure classification, recomputed on every call.
//!
//! There is no stored transition table. A product moves between statuses only
//! because time passes or because more of it is consumed; asking again with
//! the same facts and the same day always yields the same answer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::facts::{Normalized, ProductFacts, normalize};

/// The lifecycle status of a product.
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
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ProductStatus {
  Available,
  Finished,
  Expired,
  ExpiredAndFinished,
}

impl ProductStatus {
  /// Terminal statuses suppress recommendations and projections.
  pub fn is_terminal(self) -> bool { !matches!(self, Self::Available) }

  pub fn is_finished(self) -> bool {
    matches!(self, Self::Finished | Self::ExpiredAndFinished)
  }

  pub fn is_expired(self) -> bool {
    matches!(self, Self::Expired | Self::ExpiredAndFinished)
  }

  /// Combine the two independent lifecycle facts into a status.
  pub fn classify(finished: bool, expired: bool) -> Self {
    match (finished, expired) {
      (true, true) => Self::ExpiredAndFinished,
      (false, true) => Self::Expired,
      (true, false) => Self::Finished,
      (false, false) => Self::Available,
    }
  }
}

/// Derive the status of `facts` as of the calendar day `today`.
///
/// Never fails. `persisted_status` is ignored.
pub fn derive_status(facts: &ProductFacts, today: NaiveDate) -> ProductStatus {
  status_of(&normalize(facts, today), today)
}

pub(crate) fn status_of(n: &Normalized, today: NaiveDate) -> ProductStatus {
  let status = ProductStatus::classify(n.is_finished(), n.is_expired(today));
  tracing::trace!(%status, %today, "derived product status");
  status
}
