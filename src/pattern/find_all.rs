use super::{
    super::engine::{MatchError, PositionContext},
    MatchResult, Pattern, find,
};

/// Returns a lazy iterator over the successive matches of `pattern` in `text`.
///
/// Each search resumes at the end of the previous match, or one character
/// past it when that match was empty, so the iterator always terminates.
#[must_use]
pub fn find_all<'p, 't, 'c>(
    pattern: &'p Pattern,
    text: &'t str,
    context: Option<&'c PositionContext<'c>>,
) -> Matches<'p, 't, 'c> {
    Matches {
        pattern,
        text,
        context,
        pos: 0,
        remaining: None,
        done: false,
    }
}

/// The iterator returned by [`find_all`].
///
/// An error ends the iteration after it is yielded.
#[derive(Debug)]
pub struct Matches<'p, 't, 'c> {
    pattern: &'p Pattern,
    text: &'t str,
    context: Option<&'c PositionContext<'c>>,
    pos: usize,
    remaining: Option<usize>,
    done: bool,
}

impl Matches<'_, '_, '_> {
    /// Stops the iteration after at most `n` matches.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.remaining = Some(n);
        self
    }

    /// The byte offset the next search starts at.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The offset just past the character at `at`, or past the end of the
    /// text when there is none.
    fn after_char(&self, at: usize) -> usize {
        self.text
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .map_or(self.text.len() + 1, |c| at + c.len_utf8())
    }
}

impl Iterator for Matches<'_, '_, '_> {
    type Item = Result<MatchResult, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == Some(0) || self.pos > self.text.len() {
            return None;
        }

        match find(self.pattern, self.text, self.pos, self.context) {
            Ok(Some(found)) => {
                let next = if found.is_empty() {
                    self.after_char(found.end())
                } else {
                    found.end()
                };
                // `\zs` can report a span that ends before the search start.
                self.pos = next.max(self.after_char(self.pos));
                if let Some(remaining) = &mut self.remaining {
                    *remaining -= 1;
                }
                Some(Ok(found))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Matches<'_, '_, '_> {}
