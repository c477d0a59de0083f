//! Contextual lexer for game-rules source.
//!
//! The lexer is a state machine over the raw lexemes produced by
//! [`crate::tokenizer`]. Each state knows which lexemes may appear next:
//! comments are only recognised between rules, an identifier after a
//! complete condition must sit on a new line, and so on. Tokens are produced
//! on demand through the [`Iterator`] implementation. The first error is
//! reported as a [`TokenKind::Error`] token, after which the iterator is
//! exhausted, as it is after [`TokenKind::EndOfInput`].

use std::fmt;

use log::trace;
use logos::Logos;

use crate::tokenizer::{Raw, Span, operator_kind};

/// Kinds of token produced by the [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// The name of the action a rule applies to.
    ActionIdentifier,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    /// `=` or `==`.
    Eq,
    /// `!=`.
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    /// `&&`, or the single `&`.
    And,
    /// `||`, or the single `|`.
    Or,
    /// An attribute name used as an operand.
    Name,
    EndOfInput,
    Error,
}

impl TokenKind {
    /// `=`, `==`, `!=`, `>`, `>=`, `<` and `<=`.
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Gt | Self::Lt | Self::Ge | Self::Le
        )
    }

    /// `&`, `&&`, `|` and `||`.
    #[must_use]
    pub fn is_boolean(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    #[must_use]
    pub fn is_operator(self) -> bool {
        self.is_comparison() || self.is_boolean()
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::ActionIdentifier => "action identifier",
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::Eq => "'=' or '=='",
            Self::Ne => "'!='",
            Self::Gt => "'>'",
            Self::Lt => "'<'",
            Self::Ge => "'>='",
            Self::Le => "'<='",
            Self::And => "'&' or '&&'",
            Self::Or => "'|' or '||'",
            Self::Name => "identifier",
            Self::EndOfInput => "end of input",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token borrowed from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    kind: TokenKind,
    text: &'src str,
    span: Span,
    expected: Option<&'static str>,
}

impl<'src> Token<'src> {
    pub(crate) fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self {
            kind,
            text,
            span,
            expected: None,
        }
    }

    pub(crate) fn end_of_input(offset: usize) -> Self {
        Self::new(TokenKind::EndOfInput, "", offset..offset)
    }

    fn error(text: &'src str, span: Span, expected: &'static str) -> Self {
        Self {
            kind: TokenKind::Error,
            text,
            span,
            expected: Some(expected),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The source text of this token. Empty for the end of input.
    #[must_use]
    pub fn text(&self) -> &'src str {
        self.text
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.span.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// For error tokens, what the lexer expected instead.
    #[must_use]
    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }

    /// Convert an error token into a [`LexError`].
    ///
    /// Returns `None` for every other kind of token.
    #[must_use]
    pub fn lex_error(&self) -> Option<LexError> {
        let expected = self.expected?;
        Some(LexError {
            found: Found(self.text.chars().next()),
            offset: self.span.start,
            expected,
        })
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input at {}", self.span.start),
            TokenKind::Error => write!(
                f,
                "error {:?} at {}, expected {}",
                self.text,
                self.span.start,
                self.expected.unwrap_or("valid input")
            ),
            kind => write!(
                f,
                "{kind} {:?} at {}..{}",
                self.text, self.span.start, self.span.end
            ),
        }
    }
}

/// The offending character of a [`LexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Found(Option<char>);

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "{c:?}"),
            None => f.write_str("end of input"),
        }
    }
}

/// A character that cannot appear where it was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected {found} at offset {offset}, expected {expected}")]
pub struct LexError {
    found: Found,
    offset: usize,
    expected: &'static str,
}

impl LexError {
    /// The offending character, or `None` at the end of input.
    #[must_use]
    pub fn found(&self) -> Option<char> {
        self.found.0
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }
}

/// A raw lexeme with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Raw(Raw, Span),
    /// Text no raw pattern matches.
    Invalid(Span),
    End(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between rules.
    Root,
    /// After an action identifier, before its `{`.
    Action,
    /// Where a condition may start.
    Lhs,
    /// After a left-hand operand.
    Operator,
    /// After an operator.
    Rhs,
    /// After a right-hand operand or a closing parenthesis.
    AfterOperand,
    Done,
}

fn scan(raw: &mut logos::Lexer<'_, Raw>) -> Lexeme {
    match raw.next() {
        Some(Ok(kind)) => Lexeme::Raw(kind, raw.span()),
        Some(Err(())) => Lexeme::Invalid(raw.span()),
        None => Lexeme::End(raw.source().len()),
    }
}

/// Lazily tokenises game-rules source.
///
/// # Examples
///
/// ```rust
/// use game_rules::{lex, TokenKind};
///
/// let kinds: Vec<TokenKind> = lex("move { a >= b }").map(|t| t.kind()).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::ActionIdentifier,
///         TokenKind::LeftBrace,
///         TokenKind::Name,
///         TokenKind::Ge,
///         TokenKind::Name,
///         TokenKind::RightBrace,
///         TokenKind::EndOfInput,
///     ]
/// );
/// ```
pub struct Lexer<'src> {
    src: &'src str,
    raw: logos::Lexer<'src, Raw>,
    lookahead: Option<Lexeme>,
    state: State,
}

/// Start lexing `src`.
#[must_use]
pub fn lex(src: &str) -> Lexer<'_> {
    Lexer::new(src)
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            raw: Raw::lexer(src),
            lookahead: None,
            state: State::Root,
        }
    }

    fn first(&mut self) -> &Lexeme {
        self.lookahead.get_or_insert_with(|| scan(&mut self.raw))
    }

    fn bump(&mut self) -> Lexeme {
        self.lookahead.take().unwrap_or_else(|| scan(&mut self.raw))
    }

    /// Skip a whitespace run, reporting whether it crossed a newline.
    fn skip_whitespace(&mut self) -> bool {
        let mut newline = false;
        loop {
            let span = match self.first() {
                Lexeme::Raw(Raw::Whitespace, span) => span.clone(),
                _ => break,
            };
            newline |= self.src.get(span).is_some_and(|text| text.contains('\n'));
            self.bump();
        }
        newline
    }

    fn skip_whitespace_and_comments(&mut self) {
        while matches!(
            self.first(),
            Lexeme::Raw(Raw::Whitespace | Raw::Comment, _)
        ) {
            self.bump();
        }
    }

    fn emit(&mut self, kind: TokenKind, span: Span, next: State) -> Token<'src> {
        self.state = next;
        let text = self.src.get(span.clone()).unwrap_or_default();
        Token::new(kind, text, span)
    }

    fn end(&mut self, offset: usize) -> Token<'src> {
        self.state = State::Done;
        Token::end_of_input(offset)
    }

    /// Report the first character of `lexeme` as unexpected and stop.
    fn unexpected(&mut self, lexeme: Lexeme, expected: &'static str) -> Token<'src> {
        self.state = State::Done;
        let span = match lexeme {
            Lexeme::Raw(_, span) | Lexeme::Invalid(span) => {
                let width = self
                    .src
                    .get(span.start..)
                    .and_then(|rest| rest.chars().next())
                    .map_or(0, char::len_utf8);
                span.start..span.start + width
            }
            Lexeme::End(offset) => offset..offset,
        };
        let text = self.src.get(span.clone()).unwrap_or_default();
        Token::error(text, span, expected)
    }

    fn lex_root(&mut self) -> Token<'src> {
        self.skip_whitespace_and_comments();
        match self.bump() {
            Lexeme::Raw(Raw::Ident, span) => {
                self.emit(TokenKind::ActionIdentifier, span, State::Action)
            }
            Lexeme::End(offset) => self.end(offset),
            other => self.unexpected(other, "identifier or comment"),
        }
    }

    fn lex_action(&mut self) -> Token<'src> {
        self.skip_whitespace();
        match self.bump() {
            Lexeme::Raw(Raw::LBrace, span) => self.emit(TokenKind::LeftBrace, span, State::Lhs),
            // A rule without a body.
            Lexeme::End(offset) => self.end(offset),
            other => self.unexpected(other, "'{' after action identifier"),
        }
    }

    fn lex_lhs(&mut self) -> Token<'src> {
        self.skip_whitespace();
        match self.bump() {
            Lexeme::Raw(Raw::Ident, span) => self.emit(TokenKind::Name, span, State::Operator),
            Lexeme::Raw(Raw::LParen, span) => self.emit(TokenKind::LeftParen, span, State::Lhs),
            Lexeme::Raw(Raw::RBrace, span) => self.emit(TokenKind::RightBrace, span, State::Root),
            other => self.unexpected(other, "identifier or '('"),
        }
    }

    fn lex_operator(&mut self) -> Token<'src> {
        self.skip_whitespace();
        match self.bump() {
            Lexeme::Raw(Raw::Operator, span) => self.operator(span),
            // Closes a single-identifier group such as `(hp)`.
            Lexeme::Raw(Raw::RParen, span) => {
                self.emit(TokenKind::RightParen, span, State::AfterOperand)
            }
            other => self.unexpected(other, "operator"),
        }
    }

    fn operator(&mut self, span: Span) -> Token<'src> {
        let spelling = self.src.get(span.clone()).unwrap_or_default();
        if let Some(kind) = operator_kind(spelling) {
            return self.emit(kind, span, State::Rhs);
        }
        // Only a lone `!` gets here.
        let next = self.bump();
        self.unexpected(next, "'=' after '!'")
    }

    fn lex_rhs(&mut self) -> Token<'src> {
        self.skip_whitespace();
        match self.bump() {
            Lexeme::Raw(Raw::Ident, span) => {
                self.emit(TokenKind::Name, span, State::AfterOperand)
            }
            Lexeme::Raw(Raw::LParen, span) => self.emit(TokenKind::LeftParen, span, State::Lhs),
            other => self.unexpected(other, "identifier or '('"),
        }
    }

    fn lex_after_operand(&mut self) -> Token<'src> {
        let newline = self.skip_whitespace();
        match self.bump() {
            Lexeme::Raw(Raw::Ident, span) if newline => {
                self.emit(TokenKind::Name, span, State::Operator)
            }
            ident @ Lexeme::Raw(Raw::Ident, _) => self.unexpected(ident, "operator or newline"),
            Lexeme::Raw(Raw::LParen, span) => self.emit(TokenKind::LeftParen, span, State::Lhs),
            Lexeme::Raw(Raw::RParen, span) => {
                self.emit(TokenKind::RightParen, span, State::AfterOperand)
            }
            Lexeme::Raw(Raw::RBrace, span) => self.emit(TokenKind::RightBrace, span, State::Root),
            Lexeme::Raw(Raw::Operator, span) => self.operator(span),
            other => self.unexpected(other, "operator"),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        let token = match self.state {
            State::Done => return None,
            State::Root => self.lex_root(),
            State::Action => self.lex_action(),
            State::Lhs => self.lex_lhs(),
            State::Operator => self.lex_operator(),
            State::Rhs => self.lex_rhs(),
            State::AfterOperand => self.lex_after_operand(),
        };
        trace!("lexed {token}");
        Some(token)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
