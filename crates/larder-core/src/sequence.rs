//! Stale-response guard for collaborators that issue overlapping requests.
//!
//! The engine itself is synchronous and never needs this. A caller that fires
//! analysis requests while the product is still changing (a consumption
//! slider, say) tags each request with a [`Ticket`] and drops any response
//! whose ticket is no longer the latest, so a slow early response can never
//! overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing request tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
  pub fn get(self) -> u64 { self.0 }
}

/// Issues tickets and recognises the most recent one.
#[derive(Debug, Default)]
pub struct ResponseSequencer {
  latest: AtomicU64,
}

impl ResponseSequencer {
  pub fn new() -> Self { Self::default() }

  /// Tag a new request. Every call returns a strictly larger ticket.
  pub fn issue(&self) -> Ticket {
    Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
  }

  /// Whether `ticket` is the most recently issued one.
  pub fn is_current(&self, ticket: Ticket) -> bool {
    self.latest.load(Ordering::Acquire) == ticket.0
  }

  /// Keep `value` only if it answers the latest request.
  pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
    if self.is_current(ticket) {
      Some(value)
    } else {
      tracing::trace!(ticket = ticket.0, "discarding stale response");
      None
    }
  }
}
