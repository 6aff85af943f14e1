/// The bounds and preference of a quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repetition {
    pub min: usize,
    /// `None` is unbounded.
    pub max: Option<usize>,
    /// Greedy quantifiers try the most repetitions first, lazy ones the fewest.
    pub greedy: bool,
}

impl Repetition {
    #[must_use]
    pub const fn new(min: usize, max: Option<usize>, greedy: bool) -> Self {
        Self { min, max, greedy }
    }

    /// `*`
    #[must_use]
    pub const fn star(greedy: bool) -> Self {
        Self::new(0, None, greedy)
    }

    /// `+`
    #[must_use]
    pub const fn plus(greedy: bool) -> Self {
        Self::new(1, None, greedy)
    }

    /// `?`
    #[must_use]
    pub const fn question(greedy: bool) -> Self {
        Self::new(0, Some(1), greedy)
    }

    /// Returns `true` if another repetition is allowed after `count` of them.
    #[inline]
    #[must_use]
    pub fn allows(&self, count: usize) -> bool {
        self.max.is_none_or(|max| count < max)
    }
}
