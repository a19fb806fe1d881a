//! Property tests for the Sum Validator and Flattener over generated
//! balance-sheet trees.
//!
//! Generated trees are internally consistent by construction: every internal
//! node's value is computed from its children with the same summation order
//! the validator uses, so the exact-sum case is exercised without tolerance.

use balsheet_core::{
    AccountId, BalanceSheetDocument, BalanceSheetError, BalanceSheetNode, Flattener, Section,
    SumValidator,
};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn arb_account() -> impl Strategy<Value = Option<AccountId>> {
    prop_oneof![
        Just(None),
        (1000u64..9999).prop_map(|n| Some(AccountId::from(n))),
        "[A-Z]{1,3}-[0-9]{2}".prop_map(|s| Some(AccountId::Text(s))),
    ]
}

/// A tree whose internal values are exactly the sum of their children.
fn arb_node() -> impl Strategy<Value = BalanceSheetNode> {
    let leaf = (arb_name(), 0i64..1_000_000, arb_account()).prop_map(|(name, cents, account_id)| {
        BalanceSheetNode {
            name,
            value: cents as f64 / 100.0,
            account_id,
            items: None,
        }
    });

    leaf.prop_recursive(4, 64, 5, |inner| {
        (arb_name(), prop::collection::vec(inner, 0..5), arb_account()).prop_map(
            |(name, items, account_id)| BalanceSheetNode {
                name,
                value: items.iter().map(|c| c.value).sum(),
                account_id,
                items: Some(items),
            },
        )
    })
}

fn arb_document() -> impl Strategy<Value = BalanceSheetDocument> {
    (arb_node(), arb_node()).prop_map(|(liabilities, equity)| {
        let total = liabilities.value + equity.value;
        BalanceSheetDocument {
            assets: BalanceSheetNode::group(
                "assets",
                total,
                vec![BalanceSheetNode::account("plug", total, "A-PLUG")],
            ),
            liabilities,
            equity,
        }
    })
}

fn count_internal(node: &BalanceSheetNode) -> usize {
    usize::from(node.has_items()) + node.children().iter().map(count_internal).sum::<usize>()
}

/// Add `delta` to the `n`th internal node in pre-order, returning its name.
fn perturb_internal(node: &mut BalanceSheetNode, n: &mut usize, delta: f64) -> Option<String> {
    if node.has_items() {
        if *n == 0 {
            node.value += delta;
            return Some(node.name.clone());
        }
        *n -= 1;
    }
    for child in node.items.iter_mut().flatten() {
        if let Some(name) = perturb_internal(child, n, delta) {
            return Some(name);
        }
    }
    None
}

fn count_accounts(node: &BalanceSheetNode) -> usize {
    usize::from(node.account_id.is_some())
        + node.children().iter().map(count_accounts).sum::<usize>()
}

/// Reference path computation by plain recursion.
fn expected_paths(node: &BalanceSheetNode, path: &str, out: &mut Vec<(String, String)>) {
    if node.account_id.is_some() {
        out.push((path.to_string(), node.name.clone()));
    }
    let child_path = format!("{path}/{}", node.name);
    for child in node.children() {
        expected_paths(child, &child_path, out);
    }
}

proptest! {
    /// Consistent trees always validate.
    #[test]
    fn consistent_tree_validates(node in arb_node()) {
        let declared = SumValidator::new().validate_node(&node);
        prop_assert_eq!(declared, Ok(node.value));
    }

    /// Perturbing any internal node by more than the tolerance names it.
    #[test]
    fn perturbed_internal_node_is_reported(
        mut node in arb_node(),
        pick in any::<prop::sample::Index>(),
        delta in prop_oneof![0.02f64..1000.0, -1000.0f64..-0.02],
    ) {
        let internal = count_internal(&node);
        prop_assume!(internal > 0);
        let mut n = pick.index(internal);
        let name = perturb_internal(&mut node, &mut n, delta).unwrap();

        match SumValidator::new().validate_node(&node) {
            Err(BalanceSheetError::ValueMismatch { name: reported, .. }) => {
                prop_assert_eq!(reported, name);
            }
            other => {
                prop_assert!(false, "expected ValueMismatch, got {:?}", other);
            }
        }
    }

    /// assets == liabilities + equity validates; any shift of assets fails.
    #[test]
    fn balance_equation_gate(mut doc in arb_document(), shift in 0.5f64..500.0) {
        prop_assert!(SumValidator::new().validate(&doc).is_ok());

        doc.assets.value += shift;
        if let Some(items) = doc.assets.items.as_mut() {
            items[0].value += shift;
        }
        let is_equation_error = matches!(
            SumValidator::new().validate(&doc),
            Err(BalanceSheetError::BalanceEquation { .. })
        );
        prop_assert!(is_equation_error);
    }

    /// One record per node carrying an account identifier.
    #[test]
    fn flatten_is_complete(doc in arb_document()) {
        let expected: usize = doc.sections().map(|(_, root)| count_accounts(root)).sum();
        prop_assert_eq!(Flattener::new().flatten(&doc).len(), expected);
    }

    /// Paths are the ancestor chain rooted at the section key.
    #[test]
    fn flatten_paths_follow_ancestors(doc in arb_document()) {
        let mut expected = Vec::new();
        for (section, root) in doc.sections() {
            if root.account_id.is_some() {
                expected.push((section.key().to_string(), root.name.clone()));
            }
            for child in root.children() {
                expected_paths(child, section.key(), &mut expected);
            }
        }

        let actual: Vec<(String, String)> = Flattener::new()
            .flatten(&doc)
            .into_iter()
            .map(|r| (r.path, r.name))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Flattening the same document twice yields identical output.
    #[test]
    fn flatten_is_idempotent(doc in arb_document()) {
        let flattener = Flattener::new();
        prop_assert_eq!(flattener.flatten(&doc), flattener.flatten(&doc));
    }
}

#[test]
fn section_children_have_section_path() {
    let doc = BalanceSheetDocument {
        assets: BalanceSheetNode::group(
            "Total Assets",
            1.0,
            vec![BalanceSheetNode::account("cash", 1.0, "A1")],
        ),
        liabilities: BalanceSheetNode::leaf("liabilities", 0.0),
        equity: BalanceSheetNode::account("equity", 1.0, "E1"),
    };
    let records = Flattener::new().flatten(&doc);
    assert_eq!(records[0].path, Section::Assets.key());
    assert_eq!(records[1].path, Section::Equity.key());
}
