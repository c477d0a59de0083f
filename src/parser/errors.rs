//! Errors reported by the parser.

use crate::{LexError, Token, TokenKind};

/// The first problem found while parsing a game-rules source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The lexer rejected a character.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A token that cannot appear at this point.
    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    Unexpected {
        found: String,
        offset: usize,
        expected: &'static str,
    },
    /// A left-hand operand was followed by something other than an operator.
    #[error("{found} at offset {offset} is not an operator")]
    NotAnOperator { found: String, offset: usize },
    /// A condition or rule ended while a `(` was still open.
    #[error("unclosed ( before {found} at offset {offset}")]
    UnclosedParen { found: String, offset: usize },
    /// A `)` without a matching `(`.
    #[error("unexpected ) at offset {offset}")]
    UnexpectedParen { offset: usize },
}

fn found(token: &Token<'_>) -> String {
    match token.kind() {
        TokenKind::EndOfInput => "end of input".to_owned(),
        _ => format!("'{}'", token.text()),
    }
}

impl ParseError {
    pub(crate) fn unexpected(token: &Token<'_>, expected: &'static str) -> Self {
        Self::Unexpected {
            found: found(token),
            offset: token.start(),
            expected,
        }
    }

    pub(crate) fn not_an_operator(token: &Token<'_>) -> Self {
        Self::NotAnOperator {
            found: found(token),
            offset: token.start(),
        }
    }

    pub(crate) fn unclosed_paren(token: &Token<'_>) -> Self {
        Self::UnclosedParen {
            found: found(token),
            offset: token.start(),
        }
    }

    pub(crate) fn unexpected_paren(token: &Token<'_>) -> Self {
        Self::UnexpectedParen {
            offset: token.start(),
        }
    }

    /// Byte offset of the offending token or character.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::Lex(err) => err.offset(),
            Self::Unexpected { offset, .. }
            | Self::NotAnOperator { offset, .. }
            | Self::UnclosedParen { offset, .. }
            | Self::UnexpectedParen { offset } => *offset,
        }
    }

    /// What would have been accepted instead, when known.
    #[must_use]
    pub fn expected(&self) -> Option<&'static str> {
        match self {
            Self::Lex(err) => Some(err.expected()),
            Self::Unexpected { expected, .. } => Some(expected),
            Self::NotAnOperator { .. } => Some("operator"),
            Self::UnclosedParen { .. } => Some("')'"),
            Self::UnexpectedParen { .. } => None,
        }
    }
}
