use std::fmt;

/// Caller-supplied positional facts for the `\%l`, `\%c` and `\%#` anchors.
pub struct PositionContext<'a> {
    locate: Box<dyn Fn(usize) -> (usize, usize) + 'a>,
    cursor: Option<usize>,
}

impl<'a> PositionContext<'a> {
    /// Creates a context from a function mapping a byte offset to a 1-based
    /// `(line, column)` pair.
    pub fn new(locate: impl Fn(usize) -> (usize, usize) + 'a) -> Self {
        Self {
            locate: Box::new(locate),
            cursor: None,
        }
    }

    /// Creates a context that locates offsets within `text` itself.
    #[must_use]
    pub fn for_text(text: &'a str) -> Self {
        let map = LineMap::new(text);
        Self::new(move |offset| map.locate(offset))
    }

    /// Sets the cursor byte offset used by `\%#`.
    #[must_use]
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The 1-based `(line, column)` of a byte offset.
    #[must_use]
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        (self.locate)(offset)
    }
}

impl fmt::Debug for PositionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionContext")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Maps byte offsets of a text to 1-based lines and character columns.
#[derive(Clone, Debug)]
pub struct LineMap<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineMap<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Returns the 1-based `(line, column)` of `offset`. Columns count
    /// characters, so a multi-byte character advances the column by one.
    /// Offsets past the end are clamped to the end of the text.
    #[must_use]
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let column = self
            .text
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        (line, column + 1)
    }
}
