//! # Sum Validator
//!
//! Checks that every internal node's declared value equals the sum of its
//! children, then that the declared section totals satisfy
//! `assets == liabilities + equity`.
//!
//! ## Tolerance
//!
//! Parent/child comparisons allow an absolute discrepancy of
//! [`SUM_TOLERANCE`] to absorb float rounding in the source system. The root
//! equation is compared strictly unless the caller opts into
//! [`EquationCheck::WithinTolerance`].
//!
//! ## Traversal
//!
//! Post-order on an explicit stack of enter/exit frames. A node's declared
//! value, not the recomputed sum, is what its parent sees once it passes.

use tracing::Span;

use crate::error::BalanceSheetError;
use crate::node::{BalanceSheetDocument, BalanceSheetNode, Section, SUM_TOLERANCE};

/// How the root-level `assets == liabilities + equity` comparison is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EquationCheck {
    /// Exact float equality.
    #[default]
    Strict,
    /// Same absolute tolerance as the parent/child checks.
    WithinTolerance,
}

/// Declared totals of the three sections once validation has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionTotals {
    /// Declared assets total.
    pub assets: f64,
    /// Declared liabilities total.
    pub liabilities: f64,
    /// Declared equity total.
    pub equity: f64,
}

impl SectionTotals {
    /// Declared total for `section`.
    pub fn get(&self, section: Section) -> f64 {
        match section {
            Section::Assets => self.assets,
            Section::Liabilities => self.liabilities,
            Section::Equity => self.equity,
        }
    }
}

/// Recursive sum-consistency validator.
#[derive(Debug, Clone)]
pub struct SumValidator {
    tolerance: f64,
    equation: EquationCheck,
    span: Span,
}

impl Default for SumValidator {
    fn default() -> Self {
        Self::new()
    }
}

enum Frame<'a> {
    Enter(&'a BalanceSheetNode),
    Exit(&'a BalanceSheetNode),
}

impl SumValidator {
    /// Validator with [`SUM_TOLERANCE`] and a strict root equation.
    pub fn new() -> Self {
        Self {
            tolerance: SUM_TOLERANCE,
            equation: EquationCheck::Strict,
            span: tracing::info_span!("sum_validator"),
        }
    }

    /// Override the parent/child tolerance.
    ///
    /// # Errors
    ///
    /// [`BalanceSheetError::InvalidTolerance`] unless `tolerance` is finite
    /// and non-negative. A NaN tolerance would make every comparison pass.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, BalanceSheetError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(BalanceSheetError::InvalidTolerance { tolerance });
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Choose how the root equation is compared.
    pub fn with_equation_check(mut self, equation: EquationCheck) -> Self {
        self.equation = equation;
        self
    }

    /// Emit all events under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The configured parent/child tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validate all three sections and the balance equation.
    ///
    /// Sections are validated in document order; the first failing node
    /// (in post-order) aborts the run.
    ///
    /// # Errors
    ///
    /// [`BalanceSheetError::ValueMismatch`] for a parent/child disagreement,
    /// [`BalanceSheetError::BalanceEquation`] when the section totals do not
    /// balance.
    pub fn validate(&self, doc: &BalanceSheetDocument) -> Result<SectionTotals, BalanceSheetError> {
        let assets = self.validate_node(&doc.assets)?;
        let liabilities = self.validate_node(&doc.liabilities)?;
        let equity = self.validate_node(&doc.equity)?;

        let balanced = match self.equation {
            EquationCheck::Strict => assets == liabilities + equity,
            EquationCheck::WithinTolerance => {
                (assets - (liabilities + equity)).abs() <= self.tolerance
            }
        };
        if !balanced {
            tracing::error!(
                parent: &self.span,
                assets,
                liabilities,
                equity,
                "assets do not equal liabilities plus equity"
            );
            return Err(BalanceSheetError::BalanceEquation {
                assets,
                liabilities,
                equity,
            });
        }

        tracing::info!(parent: &self.span, "all parent-child sums validated successfully");
        Ok(SectionTotals {
            assets,
            liabilities,
            equity,
        })
    }

    /// Validate a single subtree and return its declared value.
    pub fn validate_node(&self, root: &BalanceSheetNode) -> Result<f64, BalanceSheetError> {
        let mut work = vec![Frame::Enter(root)];
        // Declared values of completed subtrees, in document order.
        let mut values: Vec<f64> = Vec::new();

        while let Some(frame) = work.pop() {
            match frame {
                Frame::Enter(node) => match &node.items {
                    None => values.push(node.value),
                    Some(items) => {
                        work.push(Frame::Exit(node));
                        work.extend(items.iter().rev().map(Frame::Enter));
                    }
                },
                Frame::Exit(node) => {
                    let start = values.len() - node.children().len();
                    let children_sum: f64 = values.drain(start..).sum();
                    if (node.value - children_sum).abs() > self.tolerance {
                        tracing::error!(
                            parent: &self.span,
                            node = %node.name,
                            declared = node.value,
                            children_sum,
                            "value mismatch between node and sum of its children"
                        );
                        return Err(BalanceSheetError::ValueMismatch {
                            name: node.name.clone(),
                            declared: node.value,
                            children_sum,
                        });
                    }
                    values.push(node.value);
                }
            }
        }

        Ok(values.pop().unwrap_or(root.value))
    }
}
