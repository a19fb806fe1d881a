//! # Ingestion Pipeline
//!
//! load → schema gate → typed decode → sum validation → flatten → CSV.
//!
//! Each stage runs only if the previous one passed. The CSV is written last
//! and moved into place only once complete, so a failed run never leaves a
//! partial table behind.

use std::path::PathBuf;

use balsheet_core::{
    BalanceSheetDocument, EquationCheck, Flattener, SectionTotals, SumValidator, SUM_TOLERANCE,
};
use balsheet_schema::SchemaChecker;
use clap::Args;

use crate::error::PipelineError;
use crate::load::load_document;
use crate::output::write_csv_file;

/// Validation options shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ValidationOpts {
    /// Absolute tolerance for parent/child sum checks.
    #[arg(long, default_value_t = SUM_TOLERANCE, value_parser = parse_tolerance)]
    pub tolerance: f64,

    /// Compare assets against liabilities + equity within the tolerance
    /// instead of exactly.
    #[arg(long)]
    pub equation_tolerance: bool,
}

impl Default for ValidationOpts {
    fn default() -> Self {
        Self {
            tolerance: SUM_TOLERANCE,
            equation_tolerance: false,
        }
    }
}

/// Parse `--tolerance`, rejecting NaN, infinities and negative values.
fn parse_tolerance(s: &str) -> Result<f64, String> {
    let tolerance: f64 = s
        .parse()
        .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(format!("'{s}' must be a finite, non-negative number"));
    }
    Ok(tolerance)
}

impl ValidationOpts {
    fn equation_check(&self) -> EquationCheck {
        if self.equation_tolerance {
            EquationCheck::WithinTolerance
        } else {
            EquationCheck::Strict
        }
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Balance-sheet document to ingest.
    pub input: PathBuf,
    /// CSV destination; `None` validates without writing.
    pub output: Option<PathBuf>,
    /// Sum-check options.
    pub validation: ValidationOpts,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Declared section totals.
    pub totals: SectionTotals,
    /// Number of ledger rows produced.
    pub rows: usize,
    /// Where the rows were written, if anywhere.
    pub output: Option<PathBuf>,
}

/// Run the full pipeline described by `config`.
///
/// # Errors
///
/// The first failing stage's error; nothing is written in that case.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    let span = tracing::info_span!("pipeline", input = %config.input.display());

    tracing::info!(parent: &span, "loading balance sheet document");
    let raw = load_document(&config.input)?;

    tracing::info!(parent: &span, "validating the json schema");
    SchemaChecker::new()?.with_span(span.clone()).check(&raw)?;

    let doc = BalanceSheetDocument::from_value(&raw).map_err(|e| {
        tracing::error!(parent: &span, error = %e, "cannot decode balance sheet tree");
        e
    })?;

    tracing::info!(parent: &span, "validating the values of the balance sheet");
    let totals = SumValidator::new()
        .with_tolerance(config.validation.tolerance)?
        .with_equation_check(config.validation.equation_check())
        .with_span(span.clone())
        .validate(&doc)?;

    let records = Flattener::new().with_span(span.clone()).flatten(&doc);

    if let Some(output) = &config.output {
        tracing::info!(
            parent: &span,
            "converting balance sheet to tabular format for ingestion by the data warehouse"
        );
        write_csv_file(&records, output)?;
    }

    Ok(PipelineReport {
        totals,
        rows: records.len(),
        output: config.output.clone(),
    })
}
