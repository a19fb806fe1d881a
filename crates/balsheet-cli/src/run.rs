//! # Run Subcommand
//!
//! Validates a balance-sheet document and writes its ledger rows as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::pipeline::{run_pipeline, PipelineConfig, ValidationOpts};
use crate::{DEFAULT_INPUT, DEFAULT_OUTPUT};

/// Arguments for the `balsheet run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Balance-sheet document (JSON, or YAML by extension).
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// CSV destination for the flattened rows.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[command(flatten)]
    pub validation: ValidationOpts,
}

/// Execute the run subcommand.
pub fn run_convert(args: &RunArgs) -> Result<u8> {
    let config = PipelineConfig {
        input: args.input.clone(),
        output: Some(args.output.clone()),
        validation: args.validation.clone(),
    };

    let report = run_pipeline(&config)
        .with_context(|| format!("ingesting {}", args.input.display()))?;

    println!(
        "OK: {} rows written to {} (assets {} = liabilities {} + equity {})",
        report.rows,
        args.output.display(),
        report.totals.assets,
        report.totals.liabilities,
        report.totals.equity,
    );
    Ok(0)
}
