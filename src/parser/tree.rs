//! Arena-backed parse tree.
//!
//! Nodes live in a single vector and refer to each other by [`NodeId`]. A
//! parent owns its children through the `children` list; the `parent` field
//! is a plain index used to detach and reattach subtrees during rotation.
//! Nodes removed from the tree stay in the arena but are unreachable from
//! the root.

use std::fmt;

use crate::Token;

/// Index of a node within its [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Kinds of node in the parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Container for every rule in the source.
    Root,
    /// The conditions of one action rule, tagged with the action name.
    ConditionList,
    /// An operator applied to a left and a right operand.
    Condition,
    LeftOperand,
    RightOperand,
    Identifier,
    Operator,
}

impl NodeKind {
    /// Short label used when rendering trees.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::ConditionList => "condition-list",
            Self::Condition => "condition",
            Self::LeftOperand => "lhs",
            Self::RightOperand => "rhs",
            Self::Identifier => "ident",
            Self::Operator => "op",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single node of the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode<'src> {
    kind: NodeKind,
    token: Option<Token<'src>>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    committed: bool,
}

impl<'src> ParseNode<'src> {
    fn new(kind: NodeKind, token: Option<Token<'src>>) -> Self {
        Self {
            kind,
            token,
            children: Vec::new(),
            parent: None,
            committed: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The token this node was created from.
    ///
    /// For leaves this is the identifier or operator itself; for
    /// non-terminals it is the token that anchored their creation.
    #[must_use]
    pub fn token(&self) -> Option<&Token<'src>> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether the subtree containing this node has been finalised.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

/// The parse tree of a game-rules source.
///
/// Besides the nodes, the tree carries the insertion cursor used while
/// parsing and the count of currently unmatched `(`.
#[derive(Debug, Clone)]
pub struct ParseTree<'src> {
    nodes: Vec<ParseNode<'src>>,
    root: NodeId,
    current: NodeId,
    nest_level: i32,
}

impl Default for ParseTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> ParseTree<'src> {
    /// Create a tree holding only the root container.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![ParseNode::new(NodeKind::Root, None)],
            root,
            current: root,
            nest_level: 0,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The active insertion point.
    #[must_use]
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub(crate) fn set_current(&mut self, id: NodeId) {
        self.current = id;
    }

    /// Number of `(` opened and not yet closed.
    #[must_use]
    pub fn nest_level(&self) -> i32 {
        self.nest_level
    }

    pub(crate) fn enter_group(&mut self) {
        self.nest_level += 1;
    }

    pub(crate) fn leave_group(&mut self) {
        self.nest_level -= 1;
    }

    /// Look up a node, returning `None` for ids from another tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ParseNode<'src>> {
        self.nodes.get(id.0)
    }

    #[expect(clippy::indexing_slicing, reason = "node ids are minted by this arena")]
    fn at(&self, id: NodeId) -> &ParseNode<'src> {
        &self.nodes[id.0]
    }

    #[expect(clippy::indexing_slicing, reason = "node ids are minted by this arena")]
    fn at_mut(&mut self, id: NodeId) -> &mut ParseNode<'src> {
        &mut self.nodes[id.0]
    }

    /// Kind of the node `id`.
    ///
    /// The accessors below take ids handed out by this tree. Use
    /// [`ParseTree::get`] for an id that may come from elsewhere.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.at(id).kind
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn token(&self, id: NodeId) -> Option<&Token<'src>> {
        self.at(id).token.as_ref()
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.at(id).children
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.at(id).parent
    }

    /// First child of `id` with the given kind.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// The `ConditionList` of every rule, in source order.
    #[must_use]
    pub fn condition_lists(&self) -> Vec<NodeId> {
        self.children(self.root).to_vec()
    }

    /// The action name a `ConditionList` is tagged with.
    #[must_use]
    pub fn action_name(&self, list: NodeId) -> Option<&'src str> {
        match self.get(list)? {
            node if node.kind == NodeKind::ConditionList => node.token.as_ref().map(Token::text),
            _ => None,
        }
    }

    /// Create a node that is not yet attached to the tree.
    pub(crate) fn add_detached(&mut self, kind: NodeKind, anchor: Token<'src>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ParseNode::new(kind, Some(anchor)));
        id
    }

    /// Append a node under the current insertion point.
    pub(crate) fn add_nonterminal(&mut self, kind: NodeKind, anchor: Token<'src>) -> NodeId {
        let id = self.add_detached(kind, anchor);
        self.add_child(self.current, id);
        id
    }

    /// Append a leaf under the current insertion point.
    pub(crate) fn add_terminal(&mut self, kind: NodeKind, token: Token<'src>) -> NodeId {
        self.add_nonterminal(kind, token)
    }

    /// Append a detached node as the last child of `parent`.
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.at(parent).children.len();
        self.insert_child(parent, index, child);
    }

    /// Insert a detached node among the children of `parent`.
    pub(crate) fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(
            !self.at(parent).committed,
            "cannot modify committed node {parent:?}"
        );
        debug_assert!(
            self.at(child).parent.is_none(),
            "node {child:?} already has a parent"
        );
        let children = &mut self.at_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.at_mut(child).parent = Some(parent);
    }

    /// Detach `child` from `parent`, returning the position it occupied.
    ///
    /// The detached subtree keeps its own children.
    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        let index = self.at(parent).children.iter().position(|&c| c == child)?;
        self.at_mut(parent).children.remove(index);
        self.at_mut(child).parent = None;
        Some(index)
    }

    /// Mark `id` and all of its descendants as final.
    pub(crate) fn commit_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.at_mut(next);
            node.committed = true;
            stack.extend(node.children.iter().copied());
        }
    }

    /// Iterate over `id` and its descendants in pre-order with their depth.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn walk(&self, id: NodeId) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        let mut stack = vec![(0, id)];
        std::iter::from_fn(move || {
            let (depth, next) = stack.pop()?;
            stack.extend(
                self.children(next)
                    .iter()
                    .rev()
                    .map(|&child| (depth + 1, child)),
            );
            Some((depth, next))
        })
    }
}
