//! A backtracking regular expression engine for an editor search dialect.
//!
//! Patterns are compiled once with [`compile`] and can then be searched with
//! [`find`] and [`find_all`] (or the equivalent methods on [`Pattern`]).

#![warn(clippy::pedantic, rust_2018_idioms)]
#![allow(clippy::missing_errors_doc, clippy::too_many_lines)]

pub mod ast;
pub mod charset;
pub mod engine;
pub mod flags;
pub mod lexer;
pub mod parser;
pub mod pattern;

pub use self::{
    ast::{Anchor, AstRoot, CaptureInfo, LookDirection, Node, Repetition},
    charset::{CharSet, ClassKind},
    engine::{Limits, LineMap, MatchError, PositionContext},
    flags::{CaseMode, MatchOptions, parse_flags, split_delimited},
    lexer::{Lexer, Token},
    parser::{Parser, parse_pattern},
    pattern::{
        MatchResult, Matches, Pattern, PatternBuilder, Repl, Substitution, compile, find,
        find_all, replace,
    },
};

/// An error raised while compiling a pattern or its flags.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The flag string contains an unknown flag character.
    #[error("invalid flag '{}'", .0.escape_debug())]
    InvalidFlag(char),

    /// A `pattern/flags` string has no `/` delimiter.
    #[error("missing '/' between pattern and flags")]
    MissingDelimiter,

    /// A special character appeared outside of a construct that accepts it.
    #[error("unexpected '{}' at {pos}", lit.escape_debug())]
    UnexpectedChar { pos: usize, lit: char },

    /// A backslash escape names an unknown letter.
    #[error("invalid escape sequence '\\{}' at {pos}", lit.escape_debug())]
    InvalidEscape { pos: usize, lit: char },

    /// The pattern ended in the middle of an escape sequence.
    #[error("unexpected end of pattern at {pos}")]
    UnexpectedEnd { pos: usize },

    /// A group, bracket class or repetition was never closed.
    #[error("unterminated {what} starting at {pos}")]
    Unterminated { pos: usize, what: &'static str },

    /// A `)` without a matching `(`.
    #[error("unmatched ')' at {pos}")]
    UnmatchedParen { pos: usize },

    /// `(?` followed by something other than a known group prefix.
    #[error("invalid group syntax at {pos}")]
    InvalidGroup { pos: usize },

    /// A named group or named backreference has an empty or malformed name.
    #[error("invalid group name at {pos}")]
    InvalidGroupName { pos: usize },

    /// Two named groups share a name.
    #[error("duplicate group name '{name}' at {pos}")]
    DuplicateGroupName { pos: usize, name: String },

    /// A quantifier follows nothing, an anchor or another quantifier.
    #[error("nothing to repeat at {pos}")]
    NothingToRepeat { pos: usize },

    /// A `{n,m}` quantifier with `n > m`.
    #[error("invalid repetition bounds ({min} > {max}) at {pos}")]
    InvalidRepeat { pos: usize, min: usize, max: usize },

    /// A `{...}` quantifier that is not `{n}`, `{n,}`, `{,m}` or `{n,m}`.
    #[error("malformed repetition at {pos}")]
    MalformedRepeat { pos: usize },

    /// A numbered backreference to a group the pattern does not have.
    #[error("reference to unknown group {index} at {pos}")]
    UnknownGroup { pos: usize, index: usize },

    /// A backreference to a group that is opened later in the pattern.
    #[error("reference to group {index} before it is opened at {pos}")]
    ForwardReference { pos: usize, index: usize },

    /// A named backreference to a name no group carries.
    #[error("reference to unknown group name '{name}' at {pos}")]
    UnknownGroupName { pos: usize, name: String },

    /// An invalid bracket class range or class escape.
    #[error("{err} at {pos}")]
    CharSet { pos: usize, err: charset::Error },
}

impl Error {
    /// Returns the offset in the pattern where the error was detected, if the
    /// error relates to a pattern position.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::InvalidFlag(_) | Error::MissingDelimiter => None,
            Error::UnexpectedChar { pos, .. }
            | Error::InvalidEscape { pos, .. }
            | Error::UnexpectedEnd { pos }
            | Error::Unterminated { pos, .. }
            | Error::UnmatchedParen { pos }
            | Error::InvalidGroup { pos }
            | Error::InvalidGroupName { pos }
            | Error::DuplicateGroupName { pos, .. }
            | Error::NothingToRepeat { pos }
            | Error::InvalidRepeat { pos, .. }
            | Error::MalformedRepeat { pos }
            | Error::UnknownGroup { pos, .. }
            | Error::ForwardReference { pos, .. }
            | Error::UnknownGroupName { pos, .. }
            | Error::CharSet { pos, .. } => Some(*pos),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
