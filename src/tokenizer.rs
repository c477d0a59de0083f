//! Character-class scanning for game-rules source.
//!
//! A `logos` scanner splits raw source text into lexemes: whitespace runs,
//! `#` comments, identifiers, braces, parentheses and operator spellings.
//! It knows nothing about where each lexeme is allowed; the contextual rules
//! live in [`crate::lexer`], which pulls these lexemes one at a time.
//!
//! This module also exposes `tokenize_with_trivia` and
//! `tokenize_without_trivia`, which turn the lexer's output into
//! `(SyntaxKind, Span)` pairs so that a syntax tree can mirror the input
//! exactly.

use logos::Logos;
use phf::phf_map;

use crate::{SyntaxKind, TokenKind, lex};

/// Byte range for a token within the source.
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Raw {
    #[regex(r"\s+")]
    Whitespace,
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"\p{L}[\p{L}\p{Nd}_-]*")]
    Ident,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"==?|!=?|<=?|>=?|&&?|\|\|?")]
    Operator,
}

/// Maps operator spellings to their token kind.
///
/// The single-character `&` and `|` are accepted as synonyms for `&&` and
/// `||`. A bare `!` has no entry: it is only valid as the start of `!=`.
static OPERATORS: phf::Map<&'static str, TokenKind> = phf_map! {
    "=" => TokenKind::Eq,
    "==" => TokenKind::Eq,
    "!=" => TokenKind::Ne,
    ">" => TokenKind::Gt,
    ">=" => TokenKind::Ge,
    "<" => TokenKind::Lt,
    "<=" => TokenKind::Le,
    "&" => TokenKind::And,
    "&&" => TokenKind::And,
    "|" => TokenKind::Or,
    "||" => TokenKind::Or,
};

pub(crate) fn operator_kind(spelling: &str) -> Option<TokenKind> {
    OPERATORS.get(spelling).copied()
}

/// Classify the discarded text between two tokens as trivia.
fn push_trivia(out: &mut Vec<(SyntaxKind, Span)>, src: &str, gap: Span) {
    let Some(text) = src.get(gap.clone()) else {
        return;
    };
    let mut raw = Raw::lexer(text);
    while let Some(result) = raw.next() {
        let span = raw.span();
        let kind = match result {
            Ok(Raw::Whitespace) => SyntaxKind::T_WHITESPACE,
            Ok(Raw::Comment) => SyntaxKind::T_COMMENT,
            _ => SyntaxKind::N_ERROR,
        };
        out.push((kind, gap.start + span.start..gap.start + span.end));
    }
}

#[must_use]
fn tokenize_impl(src: &str) -> Vec<(SyntaxKind, Span)> {
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "rough capacity estimate"
    )]
    let estimated_tokens = src.len() / 4; // roughly four chars per token
    let mut out = Vec::with_capacity(estimated_tokens);
    let mut cursor = 0;
    for token in lex(src) {
        push_trivia(&mut out, src, cursor..token.start());
        if token.kind() != TokenKind::EndOfInput {
            out.push((token.kind().into(), token.span()));
        }
        cursor = token.end();
    }
    out
}

/// Tokenise the source, excluding whitespace and comments.
///
/// # Examples
///
/// ```rust
/// use game_rules::{tokenize_without_trivia, SyntaxKind};
///
/// let tokens = tokenize_without_trivia("attack { a > b }");
/// assert!(!tokens.iter().any(|(k, _)| k.is_trivia()));
/// assert_eq!(tokens.len(), 6);
/// ```
#[must_use]
pub fn tokenize_without_trivia(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src)
        .into_iter()
        .filter(|(k, _)| !k.is_trivia())
        .collect()
}

/// Tokenise the provided game-rules source.
///
/// The text skipped by the lexer is reported as `T_WHITESPACE` and
/// `T_COMMENT` tokens, so for valid input the spans cover the source
/// without gaps. Output stops at the first lexing error, which is reported
/// as an `N_ERROR` token.
///
/// # Examples
///
/// ```rust
/// use game_rules::{tokenize_with_trivia, SyntaxKind};
///
/// let tokens = tokenize_with_trivia("# intro\nattack {}");
/// assert_eq!(tokens[0].0, SyntaxKind::T_COMMENT);
/// assert_eq!(tokens[2].0, SyntaxKind::T_ACTION_IDENT);
/// ```
#[must_use]
pub fn tokenize_with_trivia(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src)
}
