//! Helpers for parser and lexer assertions in tests.
//!
//! These functions panic with the offending source when parsing does not go
//! the way the test expects, which keeps individual test bodies short.

use crate::{ParseError, ParseTree, TokenKind, lex, parse};

/// Parse `src`, panicking on failure.
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "test-support")]
/// # {
/// use game_rules::test_util::parse_ok;
/// assert_eq!(parse_ok("attack {}").condition_lists().len(), 1);
/// # }
/// ```
#[must_use]
pub fn parse_ok(src: &str) -> ParseTree<'_> {
    parse(src)
        .into_result()
        .unwrap_or_else(|err| panic!("{src:?} failed to parse: {err}"))
}

/// Parse `src` and render the tree as an S-expression.
#[must_use]
pub fn sexpr(src: &str) -> String {
    parse_ok(src).to_sexpr()
}

/// Parse `src`, panicking if it succeeds.
#[must_use]
pub fn parse_err(src: &str) -> ParseError {
    let parsed = parse(src);
    match parsed.error() {
        Some(err) => err.clone(),
        None => panic!(
            "{src:?} parsed unexpectedly as {}",
            parsed.tree().to_sexpr()
        ),
    }
}

/// The kinds of every token the lexer produces for `src`.
#[must_use]
pub fn token_kinds(src: &str) -> Vec<TokenKind> {
    lex(src).map(|token| token.kind()).collect()
}
