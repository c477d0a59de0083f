//! Integration tests for the lexer and the trivia-aware tokenizer.

use game_rules::{SyntaxKind, Token, TokenKind, lex, tokenize_with_trivia, tokenize_without_trivia};
use rstest::{fixture, rstest};

#[fixture]
fn rules_file() -> &'static str {
    "# Combat rules\n\
     attack {\n  targetlevel < sourcelevel\n  moverange > dist\n}\n\n\
     # Movement\n\
     move { (stamina >= cost) && !blocked-path != wall }\n"
}

#[rstest]
fn every_token_text_matches_its_span(rules_file: &str) {
    let tokens: Vec<Token<'_>> = lex(rules_file).collect();
    assert_eq!(tokens.last().map(Token::kind), Some(TokenKind::Error));
    for token in &tokens {
        assert_eq!(rules_file.get(token.span()), Some(token.text()));
    }
}

#[rstest]
fn spans_are_ordered(rules_file: &str) {
    let tokens: Vec<Token<'_>> = lex(rules_file).collect();
    for pair in tokens.windows(2) {
        if let [a, b] = pair {
            assert!(a.end() <= b.start(), "{a} overlaps {b}");
        }
    }
}

#[test]
fn action_identifiers_start_each_rule() {
    let actions: Vec<&str> = lex("attack {}\nmove { a > b }\nrest")
        .filter(|t| t.kind() == TokenKind::ActionIdentifier)
        .map(|t| t.text())
        .collect();
    assert_eq!(actions, ["attack", "move", "rest"]);
}

#[rstest]
#[case("attack { a = b }", "=")]
#[case("attack { a == b }", "==")]
#[case("attack { a & b }", "&")]
#[case("attack { a || b }", "||")]
fn operator_text_is_kept_verbatim(#[case] src: &str, #[case] spelling: &str) {
    let op = lex(src)
        .find(|t| t.kind().is_operator())
        .unwrap_or_else(|| panic!("no operator in {src:?}"));
    assert_eq!(op.text(), spelling);
}

#[test]
fn errors_describe_what_was_expected() {
    let err = lex("attack { a > b }\nmove { c ! d }")
        .find_map(|t| t.lex_error())
        .unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(
        err.to_string(),
        "unexpected ' ' at offset 28, expected '=' after '!'"
    );
}

#[test]
fn trivia_is_reported_only_with_trivia() {
    let src = "# note\nattack { a > b }\n";
    let with = tokenize_with_trivia(src);
    let without = tokenize_without_trivia(src);
    assert!(with.iter().any(|(k, _)| *k == SyntaxKind::T_COMMENT));
    assert!(without.iter().all(|(k, _)| !k.is_trivia()));
    assert_eq!(without.len(), 6);
    let text: String = with.iter().filter_map(|(_, span)| src.get(span.clone())).collect();
    assert_eq!(text, src);
}
