//! # Check Subcommand
//!
//! Runs the schema and sum checks without writing any output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::pipeline::{run_pipeline, PipelineConfig, ValidationOpts};
use crate::DEFAULT_INPUT;

/// Arguments for the `balsheet check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Balance-sheet document (JSON, or YAML by extension).
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    #[command(flatten)]
    pub validation: ValidationOpts,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let config = PipelineConfig {
        input: args.input.clone(),
        output: None,
        validation: args.validation.clone(),
    };

    let report = run_pipeline(&config)
        .with_context(|| format!("validating {}", args.input.display()))?;

    println!(
        "OK: {} balances ({} ledger rows)",
        args.input.display(),
        report.rows
    );
    Ok(0)
}
