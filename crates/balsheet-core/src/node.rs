//! # Balance-Sheet Node Model
//!
//! A balance sheet is three section trees (assets, liabilities, equity) of
//! [`BalanceSheetNode`]s. Internal nodes aggregate their `items`; leaf-like
//! nodes carry an [`AccountId`] mapping them to a ledger account.
//!
//! Decoding is deliberately lenient about where it fails: the schema gate
//! only checks the three top-level sections, and anything wrong below that
//! surfaces here as [`BalanceSheetError::MalformedDocument`].

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::BalanceSheetError;

/// Maximum absolute discrepancy allowed between a node's declared value and
/// the sum of its children.
pub const SUM_TOLERANCE: f64 = 0.01;

/// One of the three root categories of a balance sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// What the entity owns.
    Assets,
    /// What the entity owes.
    Liabilities,
    /// Residual owners' interest.
    Equity,
}

impl Section {
    /// All sections, in document order.
    pub const ALL: [Section; 3] = [Section::Assets, Section::Liabilities, Section::Equity];

    /// The top-level document key for this section.
    pub fn key(self) -> &'static str {
        match self {
            Section::Assets => "assets",
            Section::Liabilities => "liabilities",
            Section::Equity => "equity",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// External ledger reference. Source documents use both strings and bare
/// numbers; the original scalar is preserved on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountId {
    /// Textual identifier, e.g. `"1010-CASH"`.
    Text(String),
    /// Numeric identifier, e.g. `1010`.
    Number(serde_json::Number),
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Text(s) => f.write_str(s),
            AccountId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId::Text(s.to_string())
    }
}

impl From<u64> for AccountId {
    fn from(n: u64) -> Self {
        AccountId::Number(n.into())
    }
}

/// A node in a balance-sheet tree.
///
/// Dropping a node is iterative, so trees of any depth can be freed. The
/// derived `Clone`, `PartialEq` and `Debug` still recurse and are bounded by
/// the thread's stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetNode {
    /// Display label, also the path segment for this node's descendants.
    pub name: String,
    /// Reported monetary value.
    #[serde(deserialize_with = "deserialize_amount")]
    pub value: f64,
    /// Ledger account this node maps to. `None` for pure aggregation nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Child nodes in document order. `None` on true leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BalanceSheetNode>>,
}

impl BalanceSheetNode {
    /// Create a leaf without an account identifier.
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            account_id: None,
            items: None,
        }
    }

    /// Create a leaf mapped to a ledger account.
    pub fn account(name: impl Into<String>, value: f64, account_id: impl Into<AccountId>) -> Self {
        Self {
            name: name.into(),
            value,
            account_id: Some(account_id.into()),
            items: None,
        }
    }

    /// Create an aggregation node over `items`.
    pub fn group(name: impl Into<String>, value: f64, items: Vec<BalanceSheetNode>) -> Self {
        Self {
            name: name.into(),
            value,
            account_id: None,
            items: Some(items),
        }
    }

    /// Children in document order; empty for leaves.
    pub fn children(&self) -> &[BalanceSheetNode] {
        self.items.as_deref().unwrap_or(&[])
    }

    /// True when this node aggregates children (even an empty list).
    pub fn has_items(&self) -> bool {
        self.items.is_some()
    }
}

impl Drop for BalanceSheetNode {
    fn drop(&mut self) {
        // Detach descendants onto the heap so each node drops with no items.
        let mut pending = self.items.take().unwrap_or_default();
        while let Some(mut node) = pending.pop() {
            if let Some(items) = node.items.take() {
                pending.extend(items);
            }
        }
    }
}

/// The three-section balance-sheet document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetDocument {
    /// Asset section root.
    pub assets: BalanceSheetNode,
    /// Liability section root.
    pub liabilities: BalanceSheetNode,
    /// Equity section root.
    pub equity: BalanceSheetNode,
}

impl BalanceSheetDocument {
    /// Decode an already-parsed JSON value into the typed tree.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceSheetError::MalformedDocument`] when any node is
    /// missing `name` or `value`, or carries values of the wrong type.
    pub fn from_value(value: &Value) -> Result<Self, BalanceSheetError> {
        Self::deserialize(value).map_err(|e| BalanceSheetError::MalformedDocument(e.to_string()))
    }

    /// The root node of `section`.
    pub fn section(&self, section: Section) -> &BalanceSheetNode {
        match section {
            Section::Assets => &self.assets,
            Section::Liabilities => &self.liabilities,
            Section::Equity => &self.equity,
        }
    }

    /// Section roots in document order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &BalanceSheetNode)> + '_ {
        Section::ALL.into_iter().map(move |s| (s, self.section(s)))
    }
}

/// Accepts a JSON number or a numeric string such as `"1250.75"`.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(v) => Ok(v),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("value {s:?} is not a number"))),
    }
}
