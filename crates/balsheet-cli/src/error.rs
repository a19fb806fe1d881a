//! # Pipeline Errors
//!
//! Every failure that can end a run, from a missing input file to an
//! unbalanced sheet. None is retried; the driver logs and exits non-zero.

use balsheet_core::BalanceSheetError;
use balsheet_schema::SchemaValidationError;
use thiserror::Error;

/// Error raised by any stage of the ingestion pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input document does not exist.
    #[error("balance sheet file not found at {path}")]
    SourceNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The input document exists but could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The document failed the top-level schema gate.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// The tree is malformed, a node does not sum, or the sheet does not balance.
    #[error(transparent)]
    BalanceSheet(#[from] BalanceSheetError),

    /// The CSV output could not be written.
    #[error("output error for '{path}': {reason}")]
    Output {
        /// Destination path.
        path: String,
        /// Reason the write failed.
        reason: String,
    },

    /// I/O failure outside the load and output paths above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<(), PipelineError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: disk full");
    }

    #[test]
    fn invalid_tolerance_passes_through_transparently() {
        let err = PipelineError::from(BalanceSheetError::InvalidTolerance { tolerance: -1.0 });
        assert!(err.to_string().starts_with("invalid sum tolerance -1"));
    }
}
