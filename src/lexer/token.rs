use super::super::ast::Anchor;

/// A pattern string token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A normal character.
    Literal(char),
    /// A character produced by an escape, e.g. `\.` or `\t`.
    Escaped(char),
    /// `.`
    Any,
    /// A class shorthand like `\d`, `\W` (just the letter).
    Class(char),
    /// `(`, `(?:`, `(?<name>` and the lookaround openers.
    Open(GroupKind),
    /// `)`
    RParen,
    /// `|`
    Pipe,
    /// `[` or `[^`
    LBracket { negated: bool },
    /// `]` closing a bracket class.
    RBracket,
    /// `-` inside a bracket class.
    Minus,
    /// `^`
    Caret,
    /// `$`
    Dollar,
    /// `*`, `+`, `?` or `{n,m}`, with any trailing `?` folded in.
    Repeat(RepeatToken),
    /// An escaped zero-width assertion such as `\b` or `\%5l`.
    Anchor(Anchor),
    /// `\1`, `\12` ...
    Backref(usize),
    /// `\k<name>`
    NamedBackref(String),
}

/// The kind of group a `(` token opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// `(`
    Capture,
    /// `(?:`
    NonCapture,
    /// `(?<name>`
    Named(String),
    /// `(?>=`
    LookAhead,
    /// `(?>!`
    NegLookAhead,
    /// `(?<=`
    LookBehind,
    /// `(?<!`
    NegLookBehind,
}

/// Raw quantifier bounds as written. `min > max` is left for the parser to
/// reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatToken {
    pub min: usize,
    pub max: Option<usize>,
    pub greedy: bool,
}

/// A [`Token`] with associated position information.
#[derive(Clone, Debug, Eq)]
pub struct PosToken {
    /// The start byte offset of the token in the pattern string.
    pub pos: usize,
    /// The token.
    pub token: Token,
}

impl core::ops::Deref for PosToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl PartialEq for PosToken {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}
