//! # Flattener
//!
//! Projects a balance-sheet tree into ledger rows. Every node with a
//! non-null `account_id` becomes one [`FlatRecord`]; aggregation nodes are
//! walked but not emitted.
//!
//! ## Paths
//!
//! A record's `path` is the slash-joined chain of its ancestors, starting
//! from the section key and excluding the node itself:
//!
//! ```text
//! assets                      -> path "assets"   (section root)
//! └── current                 -> path "assets"
//!     └── cash  [A1]          -> path "assets/current"
//! ```
//!
//! The section key stands in for the section root's own name, so a root
//! labelled `"Total Assets"` still yields `assets/...` paths.
//!
//! Older exports of this table kept the root's name as a second
//! segment (`assets/Total Assets/current`, or `assets/assets/current` for a
//! root named after its section). Consumers joining against those tables
//! must drop that segment.

use serde::Serialize;
use tracing::Span;

use crate::node::{AccountId, BalanceSheetDocument, BalanceSheetNode, Section};

/// One output row. Field order is the column order of the tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    /// Ancestor chain, slash-joined, starting at the section key.
    pub path: String,
    /// The node's own name.
    pub name: String,
    /// The node's declared value.
    pub value: f64,
    /// Ledger account the node maps to.
    pub account_id: AccountId,
}

/// Lazy pre-order iterator over the records of a document.
///
/// Holds an explicit stack of `(node, path)` pairs; document order is kept
/// by pushing children in reverse.
pub struct FlatRecords<'a> {
    doc: &'a BalanceSheetDocument,
    sections: std::array::IntoIter<Section, 3>,
    stack: Vec<(&'a BalanceSheetNode, String)>,
}

impl<'a> FlatRecords<'a> {
    fn new(doc: &'a BalanceSheetDocument) -> Self {
        Self {
            doc,
            sections: Section::ALL.into_iter(),
            stack: Vec::new(),
        }
    }

    fn push_children(&mut self, node: &'a BalanceSheetNode, child_path: String) {
        for child in node.children().iter().rev() {
            self.stack.push((child, child_path.clone()));
        }
    }
}

impl<'a> Iterator for FlatRecords<'a> {
    type Item = FlatRecord;

    fn next(&mut self) -> Option<FlatRecord> {
        loop {
            let Some((node, path)) = self.stack.pop() else {
                let section = self.sections.next()?;
                let doc = self.doc;
                let root = doc.section(section);
                self.push_children(root, section.key().to_string());
                if let Some(record) = emit(root, section.key()) {
                    return Some(record);
                }
                continue;
            };

            if node.has_items() {
                let child_path = format!("{path}/{}", node.name);
                self.push_children(node, child_path);
            }
            if let Some(record) = emit(node, &path) {
                return Some(record);
            }
        }
    }
}

fn emit(node: &BalanceSheetNode, path: &str) -> Option<FlatRecord> {
    node.account_id.as_ref().map(|account_id| FlatRecord {
        path: path.to_string(),
        name: node.name.clone(),
        value: node.value,
        account_id: account_id.clone(),
    })
}

/// Tree-to-table projection.
#[derive(Debug, Clone)]
pub struct Flattener {
    span: Span,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}

impl Flattener {
    /// Flattener logging under a `flattener` span.
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("flattener"),
        }
    }

    /// Emit all events under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Lazily iterate the records of `doc` in document order.
    pub fn records<'a>(&self, doc: &'a BalanceSheetDocument) -> FlatRecords<'a> {
        FlatRecords::new(doc)
    }

    /// Materialize all records of `doc` in document order.
    pub fn flatten(&self, doc: &BalanceSheetDocument) -> Vec<FlatRecord> {
        let records: Vec<FlatRecord> = self.records(doc).collect();
        tracing::debug!(parent: &self.span, rows = records.len(), "flattened balance sheet");
        records
    }
}
