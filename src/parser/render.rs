//! Text renderings of a [`ParseTree`].
//!
//! `to_sexpr` gives a compact S-expression where every condition is written
//! operator first, e.g. `(attack (&& (> a b) (< c d)))`. The `Display`
//! implementation prints an indented outline of every node.

use std::fmt;

use super::tree::{NodeId, NodeKind, ParseTree};

/// Pending output of [`ParseTree::sexpr_of`].
enum Piece<'src> {
    Text(&'src str),
    Node(NodeId),
}

impl<'src> ParseTree<'src> {
    /// Render the tree as an S-expression.
    ///
    /// Rules are separated by a single space.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use game_rules::parse;
    ///
    /// let parsed = parse("attack { a > b && c < d }");
    /// assert_eq!(parsed.tree().to_sexpr(), "(attack (&& (> a b) (< c d)))");
    /// ```
    #[must_use]
    pub fn to_sexpr(&self) -> String {
        self.sexpr_of(self.root())
    }

    /// Render the subtree rooted at `id` as an S-expression.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn sexpr_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![Piece::Node(id)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Node(id) => {
                    let pieces = self.sexpr_pieces(id);
                    stack.extend(pieces.into_iter().rev());
                }
            }
        }
        out
    }

    /// Expand one node into text and the child nodes still to render.
    fn sexpr_pieces(&self, id: NodeId) -> Vec<Piece<'src>> {
        let mut pieces = Vec::new();
        match self.kind(id) {
            NodeKind::Root | NodeKind::LeftOperand | NodeKind::RightOperand => {
                self.push_children(id, &mut pieces, "");
            }
            NodeKind::ConditionList => {
                pieces.push(Piece::Text("("));
                pieces.push(Piece::Text(self.action_name(id).unwrap_or_default()));
                self.push_children(id, &mut pieces, " ");
                pieces.push(Piece::Text(")"));
            }
            NodeKind::Condition => {
                pieces.push(Piece::Text("("));
                let op = self.child_of_kind(id, NodeKind::Operator);
                if let Some(text) = op.and_then(|op| self.token(op)).map(|t| t.text()) {
                    pieces.push(Piece::Text(text));
                }
                for kind in [NodeKind::LeftOperand, NodeKind::RightOperand] {
                    if let Some(operand) = self.child_of_kind(id, kind) {
                        pieces.push(Piece::Text(" "));
                        pieces.push(Piece::Node(operand));
                    }
                }
                pieces.push(Piece::Text(")"));
            }
            NodeKind::Identifier | NodeKind::Operator => {
                if let Some(token) = self.token(id) {
                    pieces.push(Piece::Text(token.text()));
                }
            }
        }
        pieces
    }

    /// Queue each child, putting `lead` before the first one and a space
    /// between the rest.
    fn push_children(&self, id: NodeId, pieces: &mut Vec<Piece<'src>>, lead: &'static str) {
        for (i, &child) in self.children(id).iter().enumerate() {
            pieces.push(Piece::Text(if i == 0 { lead } else { " " }));
            pieces.push(Piece::Node(child));
        }
    }
}

impl fmt::Display for ParseTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, id) in self.walk(self.root()) {
            write!(f, "{:width$}{}", "", self.kind(id), width = depth * 2)?;
            match self.kind(id) {
                NodeKind::ConditionList | NodeKind::Identifier | NodeKind::Operator => {
                    if let Some(token) = self.token(id) {
                        write!(f, " {}", token.text())?;
                    }
                }
                _ => {}
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
