//! # balsheet-core — Balance-Sheet Tree Validation & Flattening
//!
//! The in-memory half of the balance-sheet pipeline. Everything here is a
//! pure function over an immutable, fully materialized tree; file loading,
//! schema gating and CSV output live in `balsheet-schema` and `balsheet-cli`.
//!
//! ## Components
//!
//! - **Node model** (`node.rs`): [`BalanceSheetDocument`] with its three
//!   [`Section`] roots, each a recursive [`BalanceSheetNode`].
//!
//! - **Sum Validator** (`sums.rs`): every internal node's declared value must
//!   equal the sum of its children within [`SUM_TOLERANCE`], and
//!   assets must equal liabilities plus equity.
//!
//! - **Flattener** (`flatten.rs`): projects every node carrying an account
//!   identifier into a [`FlatRecord`] annotated with its ancestor path.
//!
//! ## Traversal
//!
//! Both traversals run on explicit heap stacks, so arbitrarily deep
//! hierarchies never touch the call-stack limit.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `balsheet-*` crates (this is the leaf of the DAG).
//! - No global logging state: components emit `tracing` events under a span
//!   supplied by the caller.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod flatten;
pub mod node;
pub mod sums;

pub use error::BalanceSheetError;
pub use flatten::{FlatRecord, FlatRecords, Flattener};
pub use node::{AccountId, BalanceSheetDocument, BalanceSheetNode, Section, SUM_TOLERANCE};
pub use sums::{EquationCheck, SectionTotals, SumValidator};
