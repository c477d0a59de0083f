//! Token cursor used by the parser.
//!
//! Wraps the lazy [`Lexer`] with one token of lookahead and a single-slot
//! push-back. Lexer error tokens surface as [`LexError`] values, and once the
//! lexer is exhausted every further read yields an end-of-input token.

use crate::{LexError, Lexer, Token, TokenKind};

pub(crate) struct TokenCursor<'src> {
    lexer: Lexer<'src>,
    src_len: usize,
    pending: Option<Token<'src>>,
    last: Option<Token<'src>>,
}

impl<'src> TokenCursor<'src> {
    pub(crate) fn new(src: &'src str) -> Self {
        Self {
            lexer: Lexer::new(src),
            src_len: src.len(),
            pending: None,
            last: None,
        }
    }

    fn pull(&mut self) -> Result<Token<'src>, LexError> {
        let token = self
            .lexer
            .next()
            .unwrap_or_else(|| Token::end_of_input(self.src_len));
        match token.lex_error() {
            Some(err) => Err(err),
            None => Ok(token),
        }
    }

    /// Consume the next token.
    pub(crate) fn next(&mut self) -> Result<Token<'src>, LexError> {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.pull()?,
        };
        self.last = Some(token.clone());
        Ok(token)
    }

    /// Look at the next token without consuming it.
    pub(crate) fn peek(&mut self) -> Result<&Token<'src>, LexError> {
        if self.pending.is_none() {
            self.pending = Some(self.pull()?);
        }
        Ok(self
            .pending
            .get_or_insert_with(|| Token::end_of_input(self.src_len)))
    }

    /// Whether the next token has the given kind.
    pub(crate) fn peek_is(&mut self, kind: TokenKind) -> Result<bool, LexError> {
        Ok(self.peek()?.kind() == kind)
    }

    /// Return the most recently consumed token to the stream.
    pub(crate) fn push_back(&mut self) {
        debug_assert!(self.pending.is_none(), "only one token can be pushed back");
        if let Some(token) = self.last.take() {
            self.pending = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(cursor: &mut TokenCursor<'_>, count: usize) -> Vec<TokenKind> {
        (0..count)
            .map(|_| {
                cursor
                    .next()
                    .map_or(TokenKind::Error, |token| token.kind())
            })
            .collect()
    }

    #[test]
    fn peek_does_not_consume() {
        let mut cursor = TokenCursor::new("attack { a > b }");
        assert!(matches!(cursor.peek_is(TokenKind::ActionIdentifier), Ok(true)));
        assert_eq!(
            kinds(&mut cursor, 2),
            [TokenKind::ActionIdentifier, TokenKind::LeftBrace]
        );
    }

    #[test]
    fn push_back_replays_last_token() {
        let mut cursor = TokenCursor::new("attack { a > b }");
        let _ = kinds(&mut cursor, 3);
        cursor.push_back();
        assert_eq!(kinds(&mut cursor, 2), [TokenKind::Name, TokenKind::Gt]);
    }

    #[test]
    fn end_of_input_repeats() {
        let mut cursor = TokenCursor::new("attack");
        assert_eq!(
            kinds(&mut cursor, 4),
            [
                TokenKind::ActionIdentifier,
                TokenKind::EndOfInput,
                TokenKind::EndOfInput,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn error_tokens_become_lex_errors() {
        let mut cursor = TokenCursor::new("attack { a ? b }");
        let _ = kinds(&mut cursor, 3);
        let err = cursor.next().err();
        assert_eq!(err.map(|e| e.offset()), Some(11));
    }
}
