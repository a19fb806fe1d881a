//! # balsheet-schema — Balance-Sheet Schema Gate
//!
//! The first stage of the pipeline. A parsed document must be an object with
//! `assets`, `liabilities` and `equity`, each itself an object, before any
//! sum validation runs.
//!
//! The check is intentionally shallow: nothing below the three section roots
//! is examined here. Nested shape problems are reported later, when
//! `balsheet-core` decodes the tree.
//!
//! ## Crate Policy
//!
//! - Depends on no other `balsheet-*` crate.
//! - Every violation is collected and reported, not just the first.

pub mod validate;

pub use validate::{SchemaChecker, SchemaValidationError, ValidationViolations, Violation};
