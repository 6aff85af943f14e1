use super::{
    super::charset::{CharSet, ClassKind},
    Repetition,
};
use std::fmt;

#[derive(Clone, PartialEq, Debug)]
pub enum Node {
    Literal(char),
    Any,                    // .
    Class(ClassKind, bool), // Shorthand class, negated? (e.g. \D -> (Digit, true))
    Set(CharSet),           // [...] or [^...]. CharSet handles negation internally.

    Concat(Vec<Node>),
    Alternation(Vec<Node>),

    Group {
        inner: Box<Node>,
        capture: CaptureInfo,
    },

    Quantified {
        item: Box<Node>,
        repetition: Repetition,
    },

    // Zero-width assertions
    Anchor(Anchor),

    // Group number, resolved from `\k<name>` when named
    Backreference(usize),

    Lookaround {
        inner: Box<Node>,
        direction: LookDirection,
        negated: bool,
    },
}

impl Node {
    /// An empty pattern, matching the empty string everywhere.
    #[must_use]
    pub const fn empty() -> Self {
        Node::Concat(Vec::new())
    }

    /// The nesting depth of the tree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Concat(nodes) | Node::Alternation(nodes) => {
                1 + nodes.iter().map(Node::depth).max().unwrap_or(0)
            }
            Node::Group { inner, .. }
            | Node::Lookaround { inner, .. }
            | Node::Quantified { item: inner, .. } => 1 + inner.depth(),
            Node::Literal(_)
            | Node::Any
            | Node::Class(..)
            | Node::Set(_)
            | Node::Anchor(_)
            | Node::Backreference(_) => 1,
        }
    }

    /// Returns the first anchor, in pattern order, for which `pred` holds.
    pub fn find_anchor(&self, pred: &dyn Fn(Anchor) -> bool) -> Option<Anchor> {
        match self {
            Node::Anchor(anchor) => pred(*anchor).then_some(*anchor),
            Node::Concat(nodes) | Node::Alternation(nodes) => {
                nodes.iter().find_map(|node| node.find_anchor(pred))
            }
            Node::Group { inner, .. }
            | Node::Lookaround { inner, .. }
            | Node::Quantified { item: inner, .. } => inner.find_anchor(pred),
            Node::Literal(_)
            | Node::Any
            | Node::Class(..)
            | Node::Set(_)
            | Node::Backreference(_) => None,
        }
    }
}

/// Whether, and how, a group records its match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CaptureInfo {
    /// `(?:...)`
    NonCapturing,
    /// `(...)`
    Indexed(usize),
    /// `(?<name>...)`. Named groups are numbered like any other group.
    Named(String, usize),
}

impl CaptureInfo {
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            CaptureInfo::NonCapturing => None,
            CaptureInfo::Indexed(index) | CaptureInfo::Named(_, index) => Some(*index),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LookDirection {
    Ahead,
    Behind,
}

/// A zero-width assertion.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Anchor {
    /// `\%^`
    StartOfInput,
    /// `\%$`
    EndOfInput,
    /// `^`
    StartOfLine,
    /// `$`
    EndOfLine,
    /// `\<`
    WordStart,
    /// `\>`
    WordEnd,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
    /// `\zs`
    MatchStart,
    /// `\ze`
    MatchEnd,
    /// `\%23l`, 1-based.
    AtLine(usize),
    /// `\%5c`, 1-based.
    AtColumn(usize),
    /// `\%#`
    AtCursor,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::StartOfInput => f.write_str(r"\%^"),
            Anchor::EndOfInput => f.write_str(r"\%$"),
            Anchor::StartOfLine => f.write_str("^"),
            Anchor::EndOfLine => f.write_str("$"),
            Anchor::WordStart => f.write_str(r"\<"),
            Anchor::WordEnd => f.write_str(r"\>"),
            Anchor::WordBoundary => f.write_str(r"\b"),
            Anchor::NonWordBoundary => f.write_str(r"\B"),
            Anchor::MatchStart => f.write_str(r"\zs"),
            Anchor::MatchEnd => f.write_str(r"\ze"),
            Anchor::AtLine(line) => write!(f, r"\%{line}l"),
            Anchor::AtColumn(column) => write!(f, r"\%{column}c"),
            Anchor::AtCursor => f.write_str(r"\%#"),
        }
    }
}
