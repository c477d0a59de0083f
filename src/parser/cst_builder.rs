//! Build a `rowan` green tree from the parse tree and the token stream.
//!
//! The parse tree only records identifiers and operators. Everything else,
//! from braces and parentheses to whitespace and comments, is flushed from
//! the token stream into whichever node is open when its position is
//! reached, so the syntax tree text always equals the source.
//!
//! Each condition of a rule is a single flat `N_CONDITION` node. The nesting
//! of chains and groups lives in the [`ParseTree`]; keeping it out of the
//! green tree holds its depth fixed, since `rowan` frees green nodes
//! recursively.

use log::warn;
use rowan::{GreenNode, GreenNodeBuilder, Language};

use crate::{RulesLanguage, Span, SyntaxKind};

use super::tree::{NodeId, NodeKind, ParseTree};

struct Sink<'a> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'a [(SyntaxKind, Span)],
    src: &'a str,
    pos: usize,
}

impl<'a> Sink<'a> {
    fn new(tokens: &'a [(SyntaxKind, Span)], src: &'a str) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            src,
            pos: 0,
        }
    }

    fn start(&mut self, kind: SyntaxKind) {
        self.builder.start_node(RulesLanguage::kind_to_raw(kind));
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    fn push_token(&mut self, kind: SyntaxKind, span: &Span) {
        let Some(text) = self.src.get(span.clone()) else {
            warn!(
                "token span {span:?} out of bounds for source of length {}",
                self.src.len()
            );
            return;
        };
        self.builder.token(RulesLanguage::kind_to_raw(kind), text);
    }

    /// Emit every pending token that starts before `offset`.
    fn flush_before(&mut self, offset: usize) {
        let tokens = self.tokens;
        while let Some((kind, span)) = tokens.get(self.pos) {
            if span.start >= offset {
                break;
            }
            self.push_token(*kind, span);
            self.pos += 1;
        }
    }

    /// Emit pending tokens through the next token of `kind`.
    ///
    /// Only trivia and `)` may be skipped on the way. If anything else comes
    /// first, nothing is emitted.
    fn flush_through(&mut self, kind: SyntaxKind) {
        let tokens = self.tokens;
        let rest = tokens.get(self.pos..).unwrap_or_default();
        let target = rest
            .iter()
            .find(|(k, _)| !k.is_trivia() && *k != SyntaxKind::T_RPAREN);
        match target {
            Some((found, span)) if *found == kind => self.flush_before(span.end),
            _ => {}
        }
    }

    fn flush_rest(&mut self) {
        self.flush_before(usize::MAX);
    }

    fn rule_set(&mut self, tree: &ParseTree<'_>) {
        self.start(SyntaxKind::N_RULE_SET);
        for &list in tree.children(tree.root()) {
            self.condition_list(tree, list);
        }
        self.flush_rest();
        self.finish();
    }

    fn condition_list(&mut self, tree: &ParseTree<'_>, list: NodeId) {
        if let Some(token) = tree.token(list) {
            self.flush_before(token.start());
        }
        self.start(SyntaxKind::N_CONDITION_LIST);
        self.flush_through(SyntaxKind::T_ACTION_IDENT);
        self.flush_through(SyntaxKind::T_LBRACE);
        for &condition in tree.children(list) {
            self.condition(tree, condition);
        }
        self.flush_through(SyntaxKind::T_RBRACE);
        self.finish();
    }

    /// Emit one condition of a rule with its operands and operators in
    /// source order. Nested conditions are not given nodes of their own.
    fn condition(&mut self, tree: &ParseTree<'_>, condition: NodeId) {
        if let Some(token) = tree.token(condition) {
            self.flush_before(token.start());
        }
        self.start(SyntaxKind::N_CONDITION);
        for (_, id) in tree.walk(condition) {
            let kind = tree.kind(id);
            if !matches!(kind, NodeKind::Identifier | NodeKind::Operator) {
                continue;
            }
            let Some(span) = tree.token(id).map(crate::Token::span) else {
                warn!("leaf {id:?} has no token");
                continue;
            };
            if kind == NodeKind::Operator {
                self.leaf(kind.into(), &span);
                continue;
            }
            let operand = match tree.parent(id).map(|parent| tree.kind(parent)) {
                Some(NodeKind::RightOperand) => NodeKind::RightOperand,
                _ => NodeKind::LeftOperand,
            };
            self.flush_before(span.start);
            self.start(operand.into());
            self.leaf(kind.into(), &span);
            self.finish();
        }
        self.finish();
    }

    fn leaf(&mut self, kind: SyntaxKind, span: &Span) {
        self.flush_before(span.start);
        self.start(kind);
        self.flush_before(span.end);
        self.finish();
    }
}

/// Construct the lossless syntax tree for a successfully parsed source.
pub(crate) fn build_green_tree(
    tree: &ParseTree<'_>,
    tokens: &[(SyntaxKind, Span)],
    src: &str,
) -> GreenNode {
    let mut sink = Sink::new(tokens, src);
    sink.rule_set(tree);
    sink.builder.finish()
}

#[cfg(test)]
mod tests {
    use crate::{SyntaxKind, SyntaxNode, parse};
    use rstest::rstest;

    fn syntax(src: &str) -> SyntaxNode {
        parse(src)
            .syntax()
            .unwrap_or_else(|| panic!("{src:?} should parse"))
    }

    #[rstest]
    #[case("")]
    #[case("# only a comment\n")]
    #[case("attack")]
    #[case("attack {}\n")]
    #[case("# rules\nattack {\n  targetlevel < sourcelevel\n  moverange > dist\n}\n\nmove { (a > b) && c }\n")]
    #[case("move { a && (b > c) < d }")]
    #[case("move { ((a > b)) }")]
    #[case("move { (a) >= (b) }")]
    fn text_round_trips(#[case] src: &str) {
        assert_eq!(syntax(src).text().to_string(), src);
    }

    #[test]
    fn rules_become_condition_lists() {
        let root = syntax("attack { a > b }\nmove {}\n");
        assert_eq!(root.kind(), SyntaxKind::N_RULE_SET);
        let lists: Vec<String> = root
            .children()
            .filter(|n| n.kind() == SyntaxKind::N_CONDITION_LIST)
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(lists, ["attack { a > b }", "move {}"]);
    }

    #[test]
    fn condition_contains_operands_and_operator() {
        let root = syntax("attack { hp <= max }");
        let condition = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::N_CONDITION)
            .unwrap_or_else(|| panic!("condition node missing"));
        let kinds: Vec<SyntaxKind> = condition.children().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            [
                SyntaxKind::N_LEFT_OPERAND,
                SyntaxKind::N_OPERATOR,
                SyntaxKind::N_RIGHT_OPERAND
            ]
        );
        assert_eq!(condition.text().to_string(), "hp <= max");
    }

    #[test]
    fn chains_stay_in_one_condition_node() {
        let root = syntax("attack { a > b && (c < d || e) && f }");
        let conditions = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::N_CONDITION)
            .count();
        assert_eq!(conditions, 1);
        let operators: Vec<String> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::N_OPERATOR)
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(operators, [">", "&&", "<", "||", "&&"]);
    }

    #[test]
    fn syntax_depth_does_not_grow_with_nesting() {
        let depth = 2_000;
        let src = format!(
            "attack {{ {}a > b{} }}",
            "(".repeat(depth),
            ") && c".repeat(depth)
        );
        let root = syntax(&src);
        let deepest = root
            .descendants()
            .map(|n| n.ancestors().count())
            .max()
            .unwrap_or_default();
        assert_eq!(deepest, 5);
    }

    #[test]
    fn failed_parse_has_no_syntax_tree() {
        assert!(parse("attack { a > }").syntax().is_none());
    }
}
