//! Library crate for game-rules.
//!
//! Lexes and parses the game-rules condition language: a list of rules, each
//! naming an action followed by the conditions that must hold for it.

#![forbid(unsafe_code)]

pub mod language;
pub mod lexer;
pub mod parser;
pub mod tokenizer;

// Only expose test utilities to tests and opt-in consumers.
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_util;

pub use language::{RulesLanguage, SyntaxKind, SyntaxNode};
pub use lexer::{LexError, Lexer, Token, TokenKind, lex};
pub use parser::{NodeId, NodeKind, ParseError, ParseNode, ParseTree, Parsed, parse};
pub use tokenizer::{Span, tokenize_with_trivia, tokenize_without_trivia};
