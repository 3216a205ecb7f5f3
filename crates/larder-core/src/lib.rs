//! Consumption analysis and lifecycle engine for the Larder food inventory.
//!
//! This crate is deliberately free of I/O, persistence, and clock reads. Every
//! entry point takes the current calendar day as an explicit argument, so the
//! same facts and the same day always produce the same result.

pub mod analysis;
pub mod config;
pub mod error;
pub mod facts;
pub mod notify;
pub mod reconcile;
pub mod sequence;
pub mod status;
pub mod warning;

pub use analysis::{ProductAnalysis, analyze, analyze_with};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use facts::ProductFacts;
pub use status::{ProductStatus, derive_status};
