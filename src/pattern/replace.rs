use super::{
    super::engine::{MatchError, PositionContext},
    MatchResult, Matches, Pattern, find_all,
};
pub use repl::Repl;

mod repl;

/// A piecewise substitution.
///
/// Whereas the [`replace`] function performs substitution in one shot, this
/// type separates finding each match from deciding what replaces it.
#[derive(Debug)]
pub struct Substitution<'p, 't, 'c> {
    matches: Matches<'p, 't, 'c>,
    text: &'t str,
    result: String,
    last_pos: usize,
    found: usize,
}

impl<'p, 't, 'c> Substitution<'p, 't, 'c> {
    /// Creates a substitution of at most `limit` matches, or all of them.
    #[must_use]
    pub fn new(
        pattern: &'p Pattern,
        text: &'t str,
        context: Option<&'c PositionContext<'c>>,
        limit: Option<usize>,
    ) -> Self {
        let matches = find_all(pattern, text, context);
        Self {
            matches: match limit {
                Some(n) => matches.limit(n),
                None => matches,
            },
            text,
            result: String::with_capacity(text.len()),
            last_pos: 0,
            found: 0,
        }
    }

    /// Advances to the next match that does not overlap text already
    /// replaced.
    pub fn next_match(&mut self) -> Result<Option<MatchResult>, MatchError> {
        for found in self.matches.by_ref() {
            let found = found?;
            if found.start() >= self.last_pos {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Replaces `found` with `replacement`, or keeps the matched text when
    /// `replacement` is `None`.
    pub fn replace(&mut self, found: &MatchResult, replacement: Option<&str>) {
        self.result
            .push_str(&self.text[self.last_pos..found.start()]);
        self.result
            .push_str(replacement.unwrap_or_else(|| found.as_str(self.text)));
        self.last_pos = found.end();
        self.found += 1;
    }

    /// Returns the final text and the number of replacements, consuming the
    /// substitution.
    #[must_use]
    pub fn finish(mut self) -> (String, usize) {
        self.result.push_str(&self.text[self.last_pos..]);
        (self.result, self.found)
    }
}

/// Returns a copy of `text` in which all (or the first `limit`, if given)
/// matches of `pattern` are replaced by `repl`, and the number of
/// replacements made.
///
/// Empty matches insert the replacement between characters.
///
/// # Errors
///
/// Any [`MatchError`] raised by a search aborts the substitution.
pub fn replace(
    pattern: &Pattern,
    text: &str,
    repl: &Repl<'_>,
    limit: Option<usize>,
) -> Result<(String, usize), MatchError> {
    let mut substitution = Substitution::new(pattern, text, None, limit);
    while let Some(found) = substitution.next_match()? {
        let replacement = repl.expand(&found, text);
        substitution.replace(&found, Some(&replacement));
    }
    Ok(substitution.finish())
}
