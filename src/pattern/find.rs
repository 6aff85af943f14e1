use super::{
    super::engine::{self, MatchError, MatchRanges, PositionContext},
    Pattern,
};
use std::{collections::BTreeMap, ops::Range, sync::Arc};

/// Finds the leftmost match of `pattern` in `text` that starts at or after the
/// byte offset `from`.
///
/// A `from` past the end of `text` finds nothing. `context` is required when
/// the pattern uses `\%l`, `\%c` or `\%#`.
///
/// # Errors
///
/// Returns [`MatchError::MissingContext`] if the pattern needs positional
/// context that was not given, or a limit error if the search exceeded the
/// pattern's [`Limits`](crate::Limits).
pub fn find(
    pattern: &Pattern,
    text: &str,
    from: usize,
    context: Option<&PositionContext<'_>>,
) -> Result<Option<MatchResult>, MatchError> {
    let ranges = engine::find_at(
        &pattern.ast,
        &pattern.options,
        &pattern.limits,
        text,
        from,
        context,
    )?;

    Ok(ranges.map(|ranges| MatchResult::new(ranges, Arc::clone(&pattern.names))))
}

/// A successful match: the reported span and the capture groups, as byte
/// ranges into the searched text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchResult {
    span: Range<usize>,
    captures: Vec<Option<Range<usize>>>,
    names: Arc<BTreeMap<String, usize>>,
}

impl MatchResult {
    pub(crate) fn new(ranges: MatchRanges, names: Arc<BTreeMap<String, usize>>) -> Self {
        let MatchRanges { span, captures } = ranges;
        Self {
            span,
            captures,
            names,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.span.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.span.end
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.span.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Returns `true` for a zero-width match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// The matched text. `text` must be the searched text.
    #[must_use]
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.range()).unwrap_or_default()
    }

    /// The range of group `index`; 0 is the whole span. `None` if the group
    /// does not exist or did not take part in the match.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Range<usize>> {
        self.captures.get(index).cloned().flatten()
    }

    #[must_use]
    pub fn group_str<'t>(&self, text: &'t str, index: usize) -> Option<&'t str> {
        self.get(index).and_then(|range| text.get(range))
    }

    /// The range of the group called `name`.
    #[must_use]
    pub fn name(&self, name: &str) -> Option<Range<usize>> {
        self.names.get(name).and_then(|&index| self.get(index))
    }

    #[must_use]
    pub fn name_str<'t>(&self, text: &'t str, name: &str) -> Option<&'t str> {
        self.name(name).and_then(|range| text.get(range))
    }

    /// Every capture slot, indexed by group number, slot 0 being the span.
    #[must_use]
    pub fn captures(&self) -> &[Option<Range<usize>>] {
        &self.captures
    }

    /// The number of the group called `name`.
    #[must_use]
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }
}
