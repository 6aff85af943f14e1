//! Compiled patterns and the search API built on them.

use super::{
    Result,
    ast::{AstRoot, parse_pattern},
    engine::{Limits, MatchError, PositionContext},
    flags::{MatchOptions, split_delimited},
};
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;

pub mod find;
pub mod find_all;
pub mod replace;

pub use self::{
    find::{MatchResult, find},
    find_all::{Matches, find_all},
    replace::{Repl, Substitution, replace},
};

/// Compiles `pattern` with the given `flags` using the default [`Limits`].
///
/// # Errors
///
/// If the flags or the pattern are invalid, an [`Error`](crate::Error) is
/// returned.
pub fn compile(pattern: &str, flags: &str) -> Result<Pattern> {
    PatternBuilder::new().flags(flags).build(pattern)
}

/// A compiled, immutable pattern. It can be shared between threads and
/// reused for any number of searches.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    options: MatchOptions,
    ast: AstRoot,
    names: Arc<BTreeMap<String, usize>>,
    limits: Limits,
}

impl Pattern {
    /// Compiles a `pattern/flags` string, splitting it at the last `/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDelimiter`](crate::Error::MissingDelimiter)
    /// if there is no `/`, or any error of [`compile`].
    pub fn from_delimited(input: &str) -> Result<Self> {
        let (pattern, flags) = split_delimited(input)?;
        compile(pattern, flags)
    }

    /// The pattern source, without flags.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    #[must_use]
    pub fn ast(&self) -> &AstRoot {
        &self.ast
    }

    /// The number of capturing groups, named ones included.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.ast.capture_count()
    }

    /// The named groups and their group numbers, in source order.
    pub fn capture_names(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ast
            .names()
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> core::result::Result<bool, MatchError> {
        Ok(self.find(text)?.is_some())
    }

    /// Finds the leftmost match in `text`.
    pub fn find(&self, text: &str) -> core::result::Result<Option<MatchResult>, MatchError> {
        find(self, text, 0, None)
    }

    /// Finds the leftmost match starting at or after the byte offset `from`.
    pub fn find_at(
        &self,
        text: &str,
        from: usize,
    ) -> core::result::Result<Option<MatchResult>, MatchError> {
        find(self, text, from, None)
    }

    /// Like [`Pattern::find_at`], with the context needed by `\%l`, `\%c` and
    /// `\%#`.
    pub fn find_with_context(
        &self,
        text: &str,
        from: usize,
        context: &PositionContext<'_>,
    ) -> core::result::Result<Option<MatchResult>, MatchError> {
        find(self, text, from, Some(context))
    }

    /// The leftmost match with its capture groups.
    pub fn captures(&self, text: &str) -> core::result::Result<Option<MatchResult>, MatchError> {
        self.find(text)
    }

    /// Every successive match in `text`, regardless of the `g` flag.
    #[must_use]
    pub fn find_all<'p, 't>(&'p self, text: &'t str) -> Matches<'p, 't, 'static> {
        find_all(self, text, None)
    }

    #[must_use]
    pub fn find_all_with_context<'p, 't, 'c>(
        &'p self,
        text: &'t str,
        context: &'c PositionContext<'c>,
    ) -> Matches<'p, 't, 'c> {
        find_all(self, text, Some(context))
    }

    /// The matches selected by the flags: every match with `g`, otherwise
    /// only the first.
    #[must_use]
    pub fn matches<'p, 't>(&'p self, text: &'t str) -> Matches<'p, 't, 'static> {
        let matches = find_all(self, text, None);
        if self.options.global {
            matches
        } else {
            matches.limit(1)
        }
    }

    /// Replaces every match when the `g` flag is set, otherwise only the first.
    /// Returns the new text and the number of replacements.
    pub fn replace(
        &self,
        text: &str,
        repl: &Repl<'_>,
    ) -> core::result::Result<(String, usize), MatchError> {
        let limit = (!self.options.global).then_some(1);
        replace(self, text, repl, limit)
    }

    /// Replaces every match, regardless of the `g` flag.
    pub fn replace_all(
        &self,
        text: &str,
        repl: &Repl<'_>,
    ) -> core::result::Result<(String, usize), MatchError> {
        replace(self, text, repl, None)
    }
}

/// Configures and compiles a [`Pattern`].
#[derive(Clone, Debug, Default)]
pub struct PatternBuilder {
    flags: String,
    limits: Limits,
}

impl PatternBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag string (any of `i c m s x u g`).
    pub fn flags(&mut self, flags: &str) -> &mut Self {
        flags.clone_into(&mut self.flags);
        self
    }

    /// Sets the number of choice points a single search may visit.
    pub fn backtrack_limit(&mut self, limit: usize) -> &mut Self {
        self.limits.backtrack_limit = limit;
        self
    }

    /// Sets how deeply a single search may nest.
    pub fn max_depth(&mut self, depth: usize) -> &mut Self {
        self.limits.max_depth = depth;
        self
    }

    pub fn limits(&mut self, limits: Limits) -> &mut Self {
        self.limits = limits;
        self
    }

    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// If the flags or the pattern are invalid, an [`Error`](crate::Error) is
    /// returned.
    pub fn build(&self, pattern: &str) -> Result<Pattern> {
        let options = MatchOptions::from_flags(&self.flags, pattern)?;
        let ast = parse_pattern(pattern, &options)?;
        let names = ast.names().iter().cloned().collect::<BTreeMap<_, _>>();

        debug!(
            pattern,
            flags = %self.flags,
            captures = ast.capture_count(),
            ignore_case = options.ignore_case,
            needs_context = ast.needs_locator() || ast.needs_cursor(),
            "compiled pattern"
        );

        Ok(Pattern {
            source: pattern.to_owned(),
            options,
            ast,
            names: Arc::new(names),
            limits: self.limits,
        })
    }
}
