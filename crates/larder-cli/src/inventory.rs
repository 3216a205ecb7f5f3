//! Inventory files: the product facts the CLI feeds to the engine.
//!
//! TOML by default, JSON when the file ends in `.json`:
//!
//! ```toml
//! [[products]]
//! id = "milk"
//! name = "Whole milk"
//! quantity_bought = 2
//! quantity_consumed = 0.5
//! unit = "l"
//! purchase_date = "2026-10-10"
//! expiration_date = "2026-10-20"
//! status = "AVAILABLE"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use larder_core::{ProductFacts, ProductStatus};
use serde::Deserialize;

// ─── File shape ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct Inventory {
  #[serde(default)]
  pub products: Vec<ProductEntry>,
}

/// One product as written in the inventory file.
#[derive(Debug, Deserialize)]
pub struct ProductEntry {
  pub id:                String,
  #[serde(default)]
  pub name:              String,
  pub quantity_bought:   f64,
  #[serde(default)]
  pub quantity_consumed: f64,
  #[serde(default)]
  pub unit:              String,
  pub purchase_date:     NaiveDate,
  pub expiration_date:   Option<NaiveDate>,
  /// Last status the owning application persisted, if any.
  #[serde(alias = "persisted_status")]
  pub status:            Option<ProductStatus>,
}

/// A product ready for analysis.
#[derive(Debug, Clone)]
pub struct Product {
  pub id:    String,
  pub name:  String,
  pub facts: ProductFacts,
}

impl From<ProductEntry> for Product {
  fn from(e: ProductEntry) -> Self {
    Product {
      id:    e.id,
      name:  e.name,
      facts: ProductFacts {
        quantity_bought:   e.quantity_bought,
        quantity_consumed: e.quantity_consumed,
        unit:              e.unit,
        purchase_date:     e.purchase_date,
        expiration_date:   e.expiration_date,
        persisted_status:  e.status,
      },
    }
  }
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Read and parse the inventory at `path`.
pub fn load(path: &Path) -> Result<Vec<Product>> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading inventory file {}", path.display()))?;
  let inventory = parse(&raw, is_json(path))
    .with_context(|| format!("parsing inventory file {}", path.display()))?;
  tracing::debug!(
    count = inventory.products.len(),
    path = %path.display(),
    "loaded inventory"
  );
  Ok(inventory.products.into_iter().map(Product::from).collect())
}

fn is_json(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse(raw: &str, json: bool) -> Result<Inventory> {
  if json {
    Ok(serde_json::from_str(raw)?)
  } else {
    Ok(toml::from_str(raw)?)
  }
}
