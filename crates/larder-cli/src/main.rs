//! `larder` — analyse a food inventory file from the terminal.
//!
//! # Usage
//!
//! ```text
//! larder analyze stock.toml
//! larder analyze stock.json --json --today 2026-10-16
//! larder reconcile stock.toml
//! ```
//!
//! Warning thresholds are read from `larder.toml` (or `--config`) and can be
//! overridden with `LARDER_*` environment variables, e.g.
//! `LARDER_URGENT_HORIZON_DAYS=5`.

mod inventory;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inventory::Product;
use larder_core::{
  AnalysisConfig, ProductAnalysis, ProductStatus, analyze_with,
  reconcile::reconcile,
};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "larder", version, about = "Food inventory consumption analysis")]
struct Cli {
  /// Path to a TOML file with warning thresholds.
  #[arg(short, long, value_name = "FILE", default_value = "larder.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Analyse every product in an inventory file.
  Analyze {
    /// Inventory file (TOML, or JSON when it ends in `.json`).
    file: PathBuf,

    /// Analyse as of this day instead of today (YYYY-MM-DD).
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Only show products with this derived status (repeatable).
    #[arg(long = "status", value_name = "STATUS")]
    statuses: Vec<ProductStatus>,
  },
  /// Report products whose persisted status no longer matches.
  Reconcile {
    /// Inventory file (TOML, or JSON when it ends in `.json`).
    file: PathBuf,

    /// Reconcile as of this day instead of today (YYYY-MM-DD).
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  // Logs go to stderr so `--json` output stays machine-readable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let config = load_config(&cli.config)?;

  match cli.command {
    Command::Analyze {
      file,
      today,
      json,
      statuses,
    } => run_analyze(&file, resolve_today(today), json, &statuses, &config),
    Command::Reconcile { file, today, json } => {
      run_reconcile(&file, resolve_today(today), json)
    }
  }
}

/// Layer the optional config file under `LARDER_*` environment variables.
fn load_config(path: &Path) -> Result<AnalysisConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("LARDER").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let analysis: AnalysisConfig = settings
    .try_deserialize()
    .context("failed to deserialise AnalysisConfig")?;
  analysis.validate()?;
  tracing::debug!(?analysis, "loaded analysis config");
  Ok(analysis)
}

/// The engine never reads the clock; this is the one place that does.
fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
  today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AnalyzedProduct<'a> {
  id:       &'a str,
  name:     &'a str,
  analysis: ProductAnalysis,
}

fn run_analyze(
  file: &Path,
  today: NaiveDate,
  json: bool,
  statuses: &[ProductStatus],
  config: &AnalysisConfig,
) -> Result<()> {
  let products = inventory::load(file)?;
  let analysed: Vec<(&Product, ProductAnalysis)> = products
    .iter()
    .map(|p| (p, analyze_with(&p.facts, today, config)))
    .filter(|(_, a)| {
      statuses.is_empty() || statuses.contains(&a.status_suggestion)
    })
    .collect();

  tracing::info!(
    shown = analysed.len(),
    total = products.len(),
    %today,
    "analysed inventory"
  );

  if json {
    let out: Vec<_> = analysed
      .into_iter()
      .map(|(p, analysis)| AnalyzedProduct {
        id: &p.id,
        name: &p.name,
        analysis,
      })
      .collect();
    println!(
      "{}",
      serde_json::to_string_pretty(&out).context("serialising analyses")?
    );
  } else {
    for (p, a) in &analysed {
      println!("{}", render::analysis(p, a));
    }
  }
  Ok(())
}

fn run_reconcile(file: &Path, today: NaiveDate, json: bool) -> Result<()> {
  let products = inventory::load(file)?;
  let result = reconcile(
    products.iter().map(|p| (p.id.as_str(), &p.facts)),
    today,
  );

  tracing::info!(
    stale = result.changed_count(),
    total = result.reports.len(),
    "reconciled statuses"
  );

  if json {
    println!(
      "{}",
      serde_json::to_string_pretty(&result)
        .context("serialising reconciliation")?
    );
  } else {
    print!("{}", render::reconciliation(&result));
  }
  Ok(())
}
