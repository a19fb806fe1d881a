//! # Error Types
//!
//! Failures raised while decoding or validating a balance-sheet tree. None of
//! them is recoverable within a run: the caller aborts and reports.

use thiserror::Error;

/// Error raised by the node model, the Sum Validator, or the Flattener.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BalanceSheetError {
    /// A node's declared value disagrees with the sum of its children
    /// beyond the configured tolerance.
    #[error(
        "balance sheet validation failed: {name} value does not match sum of its children \
         (node value = {declared}, sum of children = {children_sum})"
    )]
    ValueMismatch {
        /// Name of the offending node.
        name: String,
        /// The value the node declares.
        declared: f64,
        /// The recomputed sum of the node's children.
        children_sum: f64,
    },

    /// Total assets do not equal total liabilities plus equity.
    #[error(
        "assets do not equal liabilities plus equity \
         (assets = {assets}, liabilities = {liabilities}, equity = {equity})"
    )]
    BalanceEquation {
        /// Declared assets total.
        assets: f64,
        /// Declared liabilities total.
        liabilities: f64,
        /// Declared equity total.
        equity: f64,
    },

    /// The document passed the top-level schema gate but a nested node is
    /// not shaped like a balance-sheet node (missing `name`, non-numeric
    /// `value`, ...).
    #[error("malformed balance sheet document: {0}")]
    MalformedDocument(String),

    /// A sum tolerance that is negative, infinite or NaN.
    #[error("invalid sum tolerance {tolerance}: must be a finite, non-negative number")]
    InvalidTolerance {
        /// The rejected value.
        tolerance: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_mismatch_message_names_node_and_amounts() {
        let err = BalanceSheetError::ValueMismatch {
            name: "current_assets".to_string(),
            declared: 100.0,
            children_sum: 99.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("current_assets"));
        assert!(msg.contains("node value = 100"));
        assert!(msg.contains("sum of children = 99.5"));
    }

    #[test]
    fn balance_equation_message_lists_all_totals() {
        let err = BalanceSheetError::BalanceEquation {
            assets: 100.0,
            liabilities: 30.0,
            equity: 60.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("assets = 100"));
        assert!(msg.contains("liabilities = 30"));
        assert!(msg.contains("equity = 60"));
    }

    #[test]
    fn invalid_tolerance_message_shows_value() {
        let err = BalanceSheetError::InvalidTolerance { tolerance: -0.5 };
        assert!(err.to_string().contains("-0.5"));
    }
}
