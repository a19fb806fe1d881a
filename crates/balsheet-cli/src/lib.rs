//! # balsheet-cli — Balance-Sheet Ingestion CLI
//!
//! Provides the `balsheet` command-line interface and the I/O around the
//! pure validation core: document loading, pipeline orchestration, and CSV
//! output.
//!
//! ## Subcommands
//!
//! - `balsheet run` — validate and write the flattened rows as CSV.
//! - `balsheet check` — validate only.
//!
//! ```bash
//! balsheet run balance_sheet_payload.json -o json_to_tabular.csv
//! balsheet check statements/q3.yaml --equation-tolerance
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the pipeline; handlers only map
//!   arguments to a [`pipeline::PipelineConfig`].
//! - Output is written only after every check has passed.

pub mod check;
pub mod error;
pub mod load;
pub mod output;
pub mod pipeline;
pub mod run;

pub use error::PipelineError;
pub use pipeline::{run_pipeline, PipelineConfig, PipelineReport, ValidationOpts};

/// Default input file name when none is given.
pub const DEFAULT_INPUT: &str = "balance_sheet_payload.json";

/// Default CSV output file name when none is given.
pub const DEFAULT_OUTPUT: &str = "json_to_tabular.csv";
