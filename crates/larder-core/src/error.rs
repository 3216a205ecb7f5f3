//! Error types for `larder-core`.
//!
//! The engine itself is total over its inputs and never fails; errors only
//! arise when a collaborator hands over an unusable configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid analysis config: {0}")]
  InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
