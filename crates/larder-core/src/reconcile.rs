//! Batch status reconciliation.
//!
//! Given a collection of products, report for each one whether the status the
//! collaborator persisted still matches the freshly derived status. Nothing is
//! written here; persisting the corrections is the caller's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  facts::ProductFacts,
  status::{ProductStatus, derive_status},
};

/// The outcome of reconciling one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport<K> {
  pub id:        K,
  pub persisted: Option<ProductStatus>,
  pub derived:   ProductStatus,
}

impl<K> StatusReport<K> {
  /// `true` when the persisted status is missing or stale.
  pub fn changed(&self) -> bool { self.persisted != Some(self.derived) }
}

/// Reports for a whole batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation<K> {
  pub as_of:   NaiveDate,
  pub reports: Vec<StatusReport<K>>,
}

impl<K> Reconciliation<K> {
  /// Only the reports whose persisted status needs updating.
  pub fn changed(&self) -> impl Iterator<Item = &StatusReport<K>> {
    self.reports.iter().filter(|r| r.changed())
  }

  pub fn changed_count(&self) -> usize { self.changed().count() }
}

/// Derive the status of every product in `items` and compare it with the
/// persisted one.
pub fn reconcile<'a, K, I>(items: I, today: NaiveDate) -> Reconciliation<K>
where
  I: IntoIterator<Item = (K, &'a ProductFacts)>,
  K: std::fmt::Debug,
{
  let reports: Vec<_> = items
    .into_iter()
    .map(|(id, facts)| {
      let report = StatusReport {
        derived: derive_status(facts, today),
        persisted: facts.persisted_status,
        id,
      };
      if report.changed() {
        tracing::debug!(
          id = ?report.id,
          persisted = ?report.persisted,
          derived = %report.derived,
          "persisted status is stale"
        );
      }
      report
    })
    .collect();

  tracing::debug!(
    %today,
    total = reports.len(),
    "reconciled product statuses"
  );
  Reconciliation {
    as_of: today,
    reports,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn reports_only_stale_statuses_as_changed() {
    let today = day(2026, 4, 1);
    let fresh = ProductFacts::new(4.0, 1.0, "pcs", day(2026, 3, 1))
      .with_persisted_status(ProductStatus::Available);
    let stale = ProductFacts::new(4.0, 4.0, "pcs", day(2026, 3, 1))
      .with_expiration(day(2026, 3, 20))
      .with_persisted_status(ProductStatus::Finished);
    let unset = ProductFacts::new(4.0, 0.0, "pcs", day(2026, 3, 1));

    let result = reconcile(
      [("milk", &fresh), ("eggs", &stale), ("rice", &unset)],
      today,
    );

    assert_eq!(result.reports.len(), 3);
    let changed: Vec<_> = result.changed().map(|r| (r.id, r.derived)).collect();
    assert_eq!(changed, vec![
      ("eggs", ProductStatus::ExpiredAndFinished),
      ("rice", ProductStatus::Available),
    ]);
    assert_eq!(result.changed_count(), 2);
  }

  #[test]
  fn empty_batch_is_fine() {
    let result = reconcile(
      std::iter::empty::<(u32, &ProductFacts)>(),
      day(2026, 1, 1),
    );
    assert!(result.reports.is_empty());
    assert_eq!(result.changed_count(), 0);
  }
}
