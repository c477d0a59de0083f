//! Parenthesised conditions and identifiers.

use crate::test_util::{parse_err, parse_ok, sexpr};
use rstest::rstest;

#[rstest]
#[case("(a > b)", "(> a b)")]
#[case("((a > b))", "(> a b)")]
#[case("(a > b) && c", "(&& (> a b) c)")]
#[case("a && (b || c)", "(&& a (|| b c))")]
#[case("a && ((b || c))", "(&& a (|| b c))")]
#[case("(a > b && c)", "(&& (> a b) c)")]
#[case("((a > b) && c)", "(&& (> a b) c)")]
#[case("a > (b)", "(> a b)")]
#[case("(a) > b", "(> a b)")]
#[case("(a) > (b)", "(> a b)")]
#[case("a && (b > c) < d", "(&& a (< (> b c) d))")]
#[case("(a > b) > c", "(> (> a b) c)")]
fn groups(#[case] condition: &str, #[case] expected: &str) {
    let src = format!("rule {{ {condition} }}");
    assert_eq!(sexpr(&src), format!("(rule {expected})"));
}

#[test]
fn grouped_condition_followed_by_another() {
    assert_eq!(
        sexpr("rule {\n  (a > b)\n  c > d\n}"),
        "(rule (> a b) (> c d))"
    );
}

#[test]
fn groups_are_balanced_after_parsing() {
    let tree = parse_ok("rule { ((a > b) && (c < d)) || e }");
    assert_eq!(tree.nest_level(), 0);
    assert_eq!(tree.to_sexpr(), "(rule (|| (&& (> a b) (< c d)) e))");
}

const DEPTH: usize = 10_000;

#[test]
fn deeply_nested_left_groups_parse() {
    let src = format!("rule {{ {}a > b{} }}", "(".repeat(DEPTH), ") && c".repeat(DEPTH));
    let tree = parse_ok(&src);
    assert_eq!(tree.nest_level(), 0);
    assert_eq!(
        tree.to_sexpr(),
        format!("(rule {}(> a b){})", "(&& ".repeat(DEPTH), " c)".repeat(DEPTH))
    );
}

#[test]
fn deeply_nested_right_groups_parse() {
    let src = format!("rule {{ {}a > b{} }}", "a && (".repeat(DEPTH), ")".repeat(DEPTH));
    let tree = parse_ok(&src);
    assert_eq!(tree.nest_level(), 0);
    assert_eq!(
        tree.to_sexpr(),
        format!("(rule {}(> a b){})", "(&& a ".repeat(DEPTH), ")".repeat(DEPTH))
    );
}

#[test]
fn deep_group_missing_one_paren_is_unclosed() {
    let src = format!(
        "rule {{ {}a > b{} }}",
        "(".repeat(DEPTH),
        ") && c".repeat(DEPTH - 1)
    );
    let err = parse_err(&src);
    let offset = src.len() - 1;
    assert_eq!(
        err.to_string(),
        format!("unclosed ( before '}}' at offset {offset}")
    );
}
