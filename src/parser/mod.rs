//! Parser for game-rules source.
//!
//! A hand-written descent parser over the tokens of [`crate::lexer`]. Each
//! rule becomes a `ConditionList` under the root of a [`ParseTree`]; each
//! condition inside it is a binary node holding a left operand, an operator
//! and a right operand.
//!
//! The grammar is right-recursive, so chains such as `a > b && c < d` are
//! first built with the trailing operator nested on the right. When a
//! boolean operator follows a complete operand the parser rotates the chain
//! root down into the left operand of a new condition, which makes boolean
//! chains associate to the left. A comparison operator directly after a
//! boolean one rotates only the right operand just parsed. There is no
//! precedence table beyond that.
//!
//! Parenthesised groups do not recurse: the enclosing condition is pushed
//! onto an explicit stack of frames and resumed when the group closes.
//!
//! Parsing stops at the first error. The tree built up to that point is
//! still returned in [`Parsed`] for diagnostics.

mod cst_builder;
mod errors;
mod render;
mod token_stream;
mod tree;

#[cfg(test)]
mod tests;

use std::cell::OnceCell;

use log::debug;
use rowan::GreenNode;

use crate::{SyntaxNode, Token, TokenKind, tokenize_with_trivia};

pub use errors::ParseError;
pub use tree::{NodeId, NodeKind, ParseNode, ParseTree};

use token_stream::TokenCursor;

/// The result of parsing a source string.
#[derive(Debug, Clone)]
pub struct Parsed<'src> {
    src: &'src str,
    tree: ParseTree<'src>,
    error: Option<ParseError>,
    green: OnceCell<GreenNode>,
}

impl<'src> Parsed<'src> {
    /// The parse tree. Partial when [`Parsed::error`] is set.
    #[must_use]
    pub fn tree(&self) -> &ParseTree<'src> {
        &self.tree
    }

    /// The error that stopped parsing, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Return the tree, or the error that stopped parsing.
    ///
    /// # Errors
    /// Returns the first [`ParseError`] found in the source.
    pub fn into_result(self) -> Result<ParseTree<'src>, ParseError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tree),
        }
    }

    /// The lossless `rowan` green tree.
    ///
    /// The source is re-tokenised with trivia on the first call; later calls
    /// return the cached tree. Returns `None` when parsing failed.
    #[must_use]
    pub fn green(&self) -> Option<GreenNode> {
        if self.error.is_some() {
            return None;
        }
        let green = self.green.get_or_init(|| {
            let tokens = tokenize_with_trivia(self.src);
            cst_builder::build_green_tree(&self.tree, &tokens, self.src)
        });
        Some(green.clone())
    }

    /// The root of the lossless syntax tree.
    ///
    /// Returns `None` when parsing failed.
    #[must_use]
    pub fn syntax(&self) -> Option<SyntaxNode> {
        self.green().map(SyntaxNode::new_root)
    }
}

/// Parse the provided source string.
///
/// # Examples
///
/// ```rust
/// use game_rules::parse;
///
/// let parsed = parse("attack {\n  targetlevel < sourcelevel\n  moverange > dist\n}");
/// assert!(parsed.is_ok());
/// assert_eq!(
///     parsed.tree().to_sexpr(),
///     "(attack (< targetlevel sourcelevel) (> moverange dist))"
/// );
/// ```
#[must_use]
pub fn parse(src: &str) -> Parsed<'_> {
    let mut parser = Parser::new(src);
    let error = parser.parse_rules().err();
    if let Some(err) = &error {
        debug!("parse failed: {err}");
    }
    Parsed {
        src,
        tree: parser.tree,
        error,
        green: OnceCell::new(),
    }
}

/// A left operand once it is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Identifier,
    /// A parenthesised condition, with the root of its chain.
    Group(NodeId),
}

/// What `parse_expression` found at the start of an operand.
enum Expression<'src> {
    Identifier,
    /// A `(` opening a condition that starts at this token.
    Group(Token<'src>),
}

/// The open end of an operator chain.
#[derive(Debug, Clone, Copy)]
struct Chain {
    /// Top condition of the chain at its grouping level.
    root: NodeId,
    /// Condition that receives the next right operand.
    current: NodeId,
}

/// Next piece of work in [`Parser::parse_condition`].
enum Step<'src> {
    /// Start a condition under `parent`.
    Condition { parent: NodeId, first: Token<'src> },
    /// The left operand of `condition` is complete.
    Operator { condition: NodeId, operand: Operand },
    /// Parse the right operand of `op`.
    Rhs { chain: Chain, op: Token<'src> },
    /// The right operand `rhs` of `op` is complete.
    Tail {
        chain: Chain,
        op: Token<'src>,
        rhs: NodeId,
    },
    /// A condition ended; this is the root of its chain.
    Done(NodeId),
}

/// A condition suspended while a group inside one of its operands is parsed.
enum Frame<'src> {
    Lhs { condition: NodeId },
    Rhs {
        chain: Chain,
        op: Token<'src>,
        rhs: NodeId,
    },
}

struct Parser<'src> {
    tokens: TokenCursor<'src>,
    tree: ParseTree<'src>,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            tokens: TokenCursor::new(src),
            tree: ParseTree::new(),
        }
    }

    fn parse_rules(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.tokens.next()?;
            match token.kind() {
                TokenKind::ActionIdentifier => {
                    if self.tokens.peek_is(TokenKind::LeftBrace)? {
                        self.parse_condition_list(token)?;
                    } else {
                        // A rule without a body still gets its list.
                        self.tree.set_current(self.tree.root());
                        let list = self.tree.add_nonterminal(NodeKind::ConditionList, token);
                        self.tree.commit_subtree(list);
                    }
                }
                TokenKind::EndOfInput if self.tree.nest_level() > 0 => {
                    return Err(ParseError::unclosed_paren(&token));
                }
                TokenKind::EndOfInput => return Ok(()),
                _ => return Err(ParseError::unexpected(&token, "identifier")),
            }
        }
    }

    fn parse_condition_list(&mut self, action: Token<'src>) -> Result<(), ParseError> {
        let root = self.tree.root();
        self.tree.set_current(root);
        let list = self.tree.add_nonterminal(NodeKind::ConditionList, action);
        let brace = self.tokens.next()?;
        if brace.kind() != TokenKind::LeftBrace {
            return Err(ParseError::unexpected(&brace, "'{'"));
        }
        loop {
            let token = self.tokens.next()?;
            match token.kind() {
                TokenKind::RightBrace => {
                    self.tree.commit_subtree(list);
                    self.tree.set_current(root);
                    return Ok(());
                }
                TokenKind::Name | TokenKind::LeftParen => {
                    self.parse_condition(list, token)?;
                }
                _ => return Err(ParseError::unexpected(&token, "a rule")),
            }
        }
    }

    /// Parse a condition starting at `first` and attach it to `parent`.
    ///
    /// Groups suspend the enclosing condition on a stack of frames instead
    /// of recursing, so nesting depth is bounded by memory alone. Returns
    /// the root of the outermost chain.
    fn parse_condition(
        &mut self,
        parent: NodeId,
        first: Token<'src>,
    ) -> Result<NodeId, ParseError> {
        let mut frames: Vec<Frame<'src>> = Vec::new();
        let mut step = Step::Condition { parent, first };
        loop {
            step = match step {
                Step::Condition { parent, first } => {
                    self.tree.set_current(parent);
                    let condition = self
                        .tree
                        .add_nonterminal(NodeKind::Condition, first.clone());
                    self.tree.set_current(condition);
                    let lhs = self
                        .tree
                        .add_nonterminal(NodeKind::LeftOperand, first.clone());
                    self.tree.set_current(lhs);
                    match self.parse_expression(first)? {
                        Expression::Identifier => Step::Operator {
                            condition,
                            operand: Operand::Identifier,
                        },
                        Expression::Group(inner) => {
                            frames.push(Frame::Lhs { condition });
                            Step::Condition {
                                parent: lhs,
                                first: inner,
                            }
                        }
                    }
                }
                Step::Operator { condition, operand } => {
                    self.parse_operator(condition, operand)?
                }
                Step::Rhs { chain, op } => {
                    let (rhs, expression) = self.parse_rhs(chain.current, &op)?;
                    match expression {
                        Expression::Identifier => Step::Tail { chain, op, rhs },
                        Expression::Group(inner) => {
                            frames.push(Frame::Rhs { chain, op, rhs });
                            Step::Condition {
                                parent: rhs,
                                first: inner,
                            }
                        }
                    }
                }
                Step::Tail { chain, op, rhs } => self.parse_tail(chain, &op, rhs)?,
                Step::Done(root) => match frames.pop() {
                    None => return Ok(root),
                    Some(Frame::Lhs { condition }) => Step::Operator {
                        condition,
                        operand: Operand::Group(root),
                    },
                    Some(Frame::Rhs { chain, op, rhs }) => Step::Tail { chain, op, rhs },
                },
            };
        }
    }

    /// Read the operator after a complete left operand.
    fn parse_operator(
        &mut self,
        condition: NodeId,
        operand: Operand,
    ) -> Result<Step<'src>, ParseError> {
        let op = self.tokens.next()?;
        if op.kind().is_operator() {
            self.tree.set_current(condition);
            self.tree.add_terminal(NodeKind::Operator, op.clone());
            let chain = Chain {
                root: condition,
                current: condition,
            };
            return Ok(Step::Rhs { chain, op });
        }
        match operand {
            // `(a > b)` standing alone: the group is the whole condition.
            Operand::Group(inner)
                if matches!(
                    op.kind(),
                    TokenKind::Name | TokenKind::RightParen | TokenKind::RightBrace
                ) =>
            {
                self.unwrap_group(condition, inner);
                self.finish_condition(&op)?;
                Ok(Step::Done(inner))
            }
            _ => Err(ParseError::not_an_operator(&op)),
        }
    }

    /// Read the token after the right operand `rhs` of `op`.
    fn parse_tail(
        &mut self,
        chain: Chain,
        op: &Token<'src>,
        rhs: NodeId,
    ) -> Result<Step<'src>, ParseError> {
        let next = self.tokens.next()?;
        if next.kind().is_boolean() {
            let root = self.rotate(chain.root, next.clone());
            let chain = Chain {
                root,
                current: root,
            };
            Ok(Step::Rhs { chain, op: next })
        } else if next.kind().is_comparison() && op.kind().is_boolean() {
            let Some(&operand) = self.tree.children(rhs).first() else {
                return Err(ParseError::unexpected(&next, "an operand"));
            };
            let current = self.rotate(operand, next.clone());
            let chain = Chain { current, ..chain };
            Ok(Step::Rhs { chain, op: next })
        } else {
            self.finish_condition(&next)?;
            Ok(Step::Done(chain.root))
        }
    }

    /// Check the token that ended a condition.
    ///
    /// A `)` closes one group. A following condition or the end of the rule
    /// is returned to the stream for the caller.
    fn finish_condition(&mut self, token: &Token<'src>) -> Result<(), ParseError> {
        match token.kind() {
            TokenKind::Name | TokenKind::RightBrace if self.tree.nest_level() > 0 => {
                Err(ParseError::unclosed_paren(token))
            }
            TokenKind::Name | TokenKind::RightBrace => {
                self.tokens.push_back();
                Ok(())
            }
            TokenKind::RightParen if self.tree.nest_level() <= 0 => {
                Err(ParseError::unexpected_paren(token))
            }
            TokenKind::RightParen => {
                self.tree.leave_group();
                Ok(())
            }
            _ => Err(ParseError::unexpected(token, "} or condition")),
        }
    }

    /// Move `node` into the left operand of a new condition for `op`.
    ///
    /// The new condition takes the place `node` held in its parent and
    /// becomes the insertion point.
    fn rotate(&mut self, node: NodeId, op: Token<'src>) -> NodeId {
        let anchor = self.tree.token(node).cloned().unwrap_or_else(|| op.clone());
        let parent = self.tree.parent(node).unwrap_or_else(|| self.tree.root());
        let index = self.tree.remove_child(parent, node).unwrap_or(usize::MAX);

        let condition = self
            .tree
            .add_detached(NodeKind::Condition, anchor.clone());
        self.tree.insert_child(parent, index, condition);
        self.tree.set_current(condition);
        let lhs = self.tree.add_nonterminal(NodeKind::LeftOperand, anchor);
        self.tree.add_child(lhs, node);
        debug!("rotated {:?} under {op}", self.tree.kind(node));
        self.tree.add_terminal(NodeKind::Operator, op);
        condition
    }

    /// Replace the condition `outer` with the grouped condition `inner`
    /// found in its left operand.
    fn unwrap_group(&mut self, outer: NodeId, inner: NodeId) {
        if let Some(lhs) = self.tree.parent(inner) {
            self.tree.remove_child(lhs, inner);
        }
        let slot = self
            .tree
            .parent(outer)
            .and_then(|parent| Some((parent, self.tree.remove_child(parent, outer)?)));
        if let Some((parent, index)) = slot {
            self.tree.insert_child(parent, index, inner);
            debug!("unwrapped group {inner:?} into {parent:?}");
        }
    }

    /// Parse the start of the right operand of `op` and attach it to
    /// `condition`.
    fn parse_rhs(
        &mut self,
        condition: NodeId,
        op: &Token<'src>,
    ) -> Result<(NodeId, Expression<'src>), ParseError> {
        let first = self.tokens.next()?;
        if !matches!(first.kind(), TokenKind::Name | TokenKind::LeftParen) {
            return Err(ParseError::unexpected(&first, "identifier or '('"));
        }
        self.tree.set_current(condition);
        let rhs = self
            .tree
            .add_nonterminal(NodeKind::RightOperand, first.clone());
        self.tree.set_current(rhs);
        let expression = if op.kind().is_boolean() {
            self.parse_expression(first)?
        } else {
            self.parse_identifier(first)?;
            Expression::Identifier
        };
        Ok((rhs, expression))
    }

    /// An identifier, optionally in parentheses, as the right operand of a
    /// comparison.
    fn parse_identifier(&mut self, first: Token<'src>) -> Result<(), ParseError> {
        match first.kind() {
            TokenKind::Name => {
                self.tree.add_terminal(NodeKind::Identifier, first);
                Ok(())
            }
            TokenKind::LeftParen => {
                let name = self.tokens.next()?;
                if name.kind() != TokenKind::Name {
                    return Err(ParseError::unexpected(&name, "an identifier"));
                }
                let close = self.tokens.next()?;
                if close.kind() != TokenKind::RightParen {
                    return Err(ParseError::unexpected(&close, "')'"));
                }
                self.tree.add_terminal(NodeKind::Identifier, name);
                Ok(())
            }
            _ => Err(ParseError::unexpected(&first, "an identifier")),
        }
    }

    /// Parse an identifier operand, or open a group and return the token
    /// its condition starts at.
    fn parse_expression(&mut self, first: Token<'src>) -> Result<Expression<'src>, ParseError> {
        match first.kind() {
            TokenKind::Name => {
                self.tree.add_terminal(NodeKind::Identifier, first);
                Ok(Expression::Identifier)
            }
            TokenKind::LeftParen => {
                let inner = self.tokens.next()?;
                match inner.kind() {
                    TokenKind::Name if self.tokens.peek_is(TokenKind::RightParen)? => {
                        self.tokens.next()?;
                        self.tree.add_terminal(NodeKind::Identifier, inner);
                        Ok(Expression::Identifier)
                    }
                    TokenKind::Name | TokenKind::LeftParen => {
                        self.tree.enter_group();
                        Ok(Expression::Group(inner))
                    }
                    _ => Err(ParseError::unexpected(&inner, "an expression")),
                }
            }
            _ => Err(ParseError::unexpected(&first, "an expression")),
        }
    }
}
