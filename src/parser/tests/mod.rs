//! Tests for the parser and the shape of the trees it builds.

mod grouping;

use crate::test_util::{parse_ok, sexpr};
use crate::{NodeKind, parse};
use rstest::rstest;

#[rstest]
#[case("attack { a > b }", "(attack (> a b))")]
#[case(
    "attack {\n  targetlevel < sourcelevel\n  moverange > dist\n}",
    "(attack (< targetlevel sourcelevel) (> moverange dist))"
)]
#[case("# leading\nattack {}\n# trailing\n", "(attack)")]
#[case("attack {}\nmove {}", "(attack) (move)")]
#[case("attack", "(attack)")]
#[case("attack { a = b\n c == d\n e != f }", "(attack (= a b) (== c d) (!= e f))")]
fn rules(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(sexpr(src), expected);
}

#[test]
fn empty_source_has_no_rules() {
    let tree = parse_ok("");
    assert!(tree.condition_lists().is_empty());
    assert_eq!(tree.nest_level(), 0);
}

#[test]
fn one_condition_list_per_rule_in_order() {
    let tree = parse_ok("attack { a > b }\n\n# spells\ncast { mana >= cost }\nflee");
    let names: Vec<&str> = tree
        .condition_lists()
        .into_iter()
        .filter_map(|list| tree.action_name(list))
        .collect();
    assert_eq!(names, ["attack", "cast", "flee"]);
}

#[test]
fn committed_lists_and_reset_cursor() {
    let tree = parse_ok("attack { a > b && c }\nmove {}");
    assert_eq!(tree.current(), tree.root());
    for list in tree.condition_lists() {
        assert!(
            tree.walk(list)
                .all(|(_, id)| tree.get(id).is_some_and(|node| node.is_committed()))
        );
    }
}

#[test]
fn conditions_have_lhs_operator_rhs() {
    let tree = parse_ok("attack { a > b && (c < d) }");
    for (_, id) in tree.walk(tree.root()) {
        if tree.kind(id) != NodeKind::Condition {
            continue;
        }
        let kinds: Vec<NodeKind> = tree.children(id).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(
            kinds,
            [
                NodeKind::LeftOperand,
                NodeKind::Operator,
                NodeKind::RightOperand
            ]
        );
    }
}

#[test]
fn parent_links_match_children() {
    let tree = parse_ok("attack { (a > b) && c || d < e }");
    for (_, id) in tree.walk(tree.root()) {
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
    }
}

#[test]
fn leaves_keep_their_tokens() {
    let tree = parse_ok("attack { hp <= max }");
    let leaves: Vec<(NodeKind, &str)> = tree
        .walk(tree.root())
        .filter(|&(_, id)| tree.children(id).is_empty())
        .filter_map(|(_, id)| Some((tree.kind(id), tree.token(id)?.text())))
        .collect();
    assert_eq!(
        leaves,
        [
            (NodeKind::Identifier, "hp"),
            (NodeKind::Operator, "<="),
            (NodeKind::Identifier, "max"),
        ]
    );
}

#[test]
fn reparsing_is_deterministic() {
    let src = "attack { a > b && c < d || (e = f) }\nmove { x != y }";
    assert_eq!(sexpr(src), sexpr(src));
    assert_eq!(parse(src).tree().to_string(), parse(src).tree().to_string());
}

#[test]
fn green_tree_is_built_once() {
    let parsed = parse("attack { a > b }\nmove { c < d }");
    let (Some(first), Some(second)) = (parsed.green(), parsed.green()) else {
        panic!("source should parse");
    };
    assert!(std::ptr::eq::<rowan::GreenNodeData>(&*first, &*second));
    let text = parsed.syntax().map(|root| root.text().to_string());
    assert_eq!(text.as_deref(), Some("attack { a > b }\nmove { c < d }"));
}
