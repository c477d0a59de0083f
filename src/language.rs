//! `rowan` integration and game-rules syntax kinds.
//!
//! This module defines the `SyntaxKind` enum covering every token and node
//! that can appear in the lossless syntax tree. The `RulesLanguage` newtype
//! implements `rowan::Language` using conversions provided by `num_derive`.

use num_derive::{FromPrimitive as FromPrimitiveDerive, ToPrimitive as ToPrimitiveDerive};
use num_traits::{FromPrimitive, ToPrimitive};
use rowan::Language as RowanLanguage;
use rowan::SyntaxKind as RowanSyntaxKind;

use crate::TokenKind;
use crate::parser::NodeKind;

/// Every possible token or node in the game-rules syntax tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitiveDerive, ToPrimitiveDerive,
)]
#[repr(u16)]
#[expect(non_camel_case_types, reason = "kind naming mirrors rowan conventions")]
pub enum SyntaxKind {
    // Trivia
    T_WHITESPACE,
    T_COMMENT,
    // Tokens
    T_ACTION_IDENT,
    T_LBRACE,
    T_RBRACE,
    T_LPAREN,
    T_RPAREN,
    T_EQ,
    T_NE,
    T_GT,
    T_LT,
    T_GE,
    T_LE,
    T_AND,
    T_OR,
    T_NAME,
    T_EOF,
    // Nodes
    N_RULE_SET,
    N_CONDITION_LIST,
    N_CONDITION,
    N_LEFT_OPERAND,
    N_RIGHT_OPERAND,
    N_IDENTIFIER,
    N_OPERATOR,
    // Special
    N_ERROR,
}

impl SyntaxKind {
    /// Whether this kind is whitespace or a comment.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::T_WHITESPACE | Self::T_COMMENT)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::ActionIdentifier => Self::T_ACTION_IDENT,
            TokenKind::LeftBrace => Self::T_LBRACE,
            TokenKind::RightBrace => Self::T_RBRACE,
            TokenKind::LeftParen => Self::T_LPAREN,
            TokenKind::RightParen => Self::T_RPAREN,
            TokenKind::Eq => Self::T_EQ,
            TokenKind::Ne => Self::T_NE,
            TokenKind::Gt => Self::T_GT,
            TokenKind::Lt => Self::T_LT,
            TokenKind::Ge => Self::T_GE,
            TokenKind::Le => Self::T_LE,
            TokenKind::And => Self::T_AND,
            TokenKind::Or => Self::T_OR,
            TokenKind::Name => Self::T_NAME,
            TokenKind::EndOfInput => Self::T_EOF,
            TokenKind::Error => Self::N_ERROR,
        }
    }
}

impl From<NodeKind> for SyntaxKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Root => Self::N_RULE_SET,
            NodeKind::ConditionList => Self::N_CONDITION_LIST,
            NodeKind::Condition => Self::N_CONDITION,
            NodeKind::LeftOperand => Self::N_LEFT_OPERAND,
            NodeKind::RightOperand => Self::N_RIGHT_OPERAND,
            NodeKind::Identifier => Self::N_IDENTIFIER,
            NodeKind::Operator => Self::N_OPERATOR,
        }
    }
}

/// Newtype wrapper allowing `rowan` to store `SyntaxKind` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RulesLanguage;

impl RowanLanguage for RulesLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: RowanSyntaxKind) -> Self::Kind {
        SyntaxKind::from_u16(raw.0).unwrap_or(SyntaxKind::N_ERROR)
    }

    fn kind_to_raw(kind: Self::Kind) -> RowanSyntaxKind {
        RowanSyntaxKind(
            kind.to_u16()
                .unwrap_or_else(|| unreachable!("all SyntaxKind variants map to u16")),
        )
    }
}

/// A node of the lossless syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<RulesLanguage>;
