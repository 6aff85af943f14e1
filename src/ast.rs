pub mod node;
pub mod quantifier;

pub use self::{
    node::{Anchor, CaptureInfo, LookDirection, Node},
    quantifier::Repetition,
};
pub use super::parser::parse_pattern;

/// A parsed pattern together with the facts the engine needs about it.
#[derive(Clone, Debug, PartialEq)]
pub struct AstRoot {
    tree: Node,
    capture_count: usize,
    names: Vec<(String, usize)>,
    depth: usize,
}

impl AstRoot {
    #[must_use]
    pub(crate) fn new(tree: Node, capture_count: usize, names: Vec<(String, usize)>) -> Self {
        let depth = tree.depth();
        Self {
            tree,
            capture_count,
            names,
            depth,
        }
    }

    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// How deeply the pattern nests.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The named groups, in source order, with their group numbers.
    #[must_use]
    pub fn names(&self) -> &[(String, usize)] {
        &self.names
    }

    /// Returns `true` if the pattern contains `\%l` or `\%c`.
    #[must_use]
    pub fn needs_locator(&self) -> bool {
        self.tree
            .find_anchor(&|anchor| matches!(anchor, Anchor::AtLine(_) | Anchor::AtColumn(_)))
            .is_some()
    }

    /// Returns `true` if the pattern contains `\%#`.
    #[must_use]
    pub fn needs_cursor(&self) -> bool {
        self.tree
            .find_anchor(&|anchor| anchor == Anchor::AtCursor)
            .is_some()
    }

    /// Returns `true` if no match can start anywhere but offset 0.
    #[must_use]
    pub fn is_anchored_start(&self, multiline: bool) -> bool {
        let first = match &self.tree {
            Node::Concat(nodes) => nodes.first(),
            node => Some(node),
        };
        match first {
            Some(Node::Anchor(Anchor::StartOfInput)) => true,
            Some(Node::Anchor(Anchor::StartOfLine)) => !multiline,
            _ => false,
        }
    }
}

impl std::ops::Deref for AstRoot {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl PartialEq<Node> for AstRoot {
    fn eq(&self, other: &Node) -> bool {
        self.tree == *other
    }
}
