//! Shared test utilities for integration tests.
//!
//! These helpers mirror a subset of the `game_rules::test_util` module without
//! requiring the `test-support` feature, so integration tests compile against
//! the published library.

#![expect(
    dead_code,
    reason = "helpers are reused across multiple tests so some may be unused"
)]

use game_rules::{ParseError, ParseTree, SyntaxNode, parse};

/// Parse `src`, panicking on failure.
pub fn parse_ok(src: &str) -> ParseTree<'_> {
    parse(src)
        .into_result()
        .unwrap_or_else(|err| panic!("{src:?} failed to parse: {err}"))
}

/// Parse `src` and return the error, panicking if it succeeds.
pub fn parse_err(src: &str) -> ParseError {
    parse(src)
        .into_result()
        .err()
        .unwrap_or_else(|| panic!("{src:?} parsed unexpectedly"))
}

/// The lossless syntax tree of `src`, panicking if parsing fails.
pub fn syntax(src: &str) -> SyntaxNode {
    parse(src)
        .syntax()
        .unwrap_or_else(|| panic!("{src:?} failed to parse"))
}

/// Collect the text of a syntax subtree token by token.
///
/// Uses an explicit stack so deeply nested input does not recurse.
pub fn pretty_print(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut stack: Vec<rowan::SyntaxElement<game_rules::RulesLanguage>> =
        vec![rowan::NodeOrToken::Node(node.clone())];
    while let Some(item) = stack.pop() {
        match item {
            rowan::NodeOrToken::Token(t) => out.push_str(t.text()),
            rowan::NodeOrToken::Node(n) => {
                let children: Vec<_> = n.children_with_tokens().collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }
    out
}
