use super::{Limits, MatchError};
use std::ops::Range;
use tracing::warn;

/// A reversible change to the match state.
#[derive(Debug)]
enum Undo {
    Capture(usize, Option<Range<usize>>),
    MatchStart(Option<usize>),
    MatchEnd(Option<usize>),
}

/// Mutable state of a single match attempt: capture slots, the `\zs`/`\ze`
/// overrides and the backtrack budget.
///
/// Every write goes through the undo log, so a failed branch restores the
/// state by rolling back to the mark taken before it.
#[derive(Debug)]
pub(super) struct State {
    captures: Vec<Option<Range<usize>>>,
    match_start: Option<usize>,
    match_end: Option<usize>,
    undo: Vec<Undo>,
    steps: usize,
    limits: Limits,
}

impl State {
    /// Slot 0 is reserved for the overall span.
    pub fn new(capture_count: usize, limits: Limits) -> Self {
        Self {
            captures: vec![None; capture_count + 1],
            match_start: None,
            match_end: None,
            undo: Vec::new(),
            steps: 0,
            limits,
        }
    }

    /// Prepares the state for a match attempt at a new start offset. Each
    /// attempt gets the full backtrack budget.
    pub fn reset(&mut self) {
        self.captures.fill(None);
        self.match_start = None;
        self.match_end = None;
        self.undo.clear();
        self.steps = 0;
    }

    #[inline]
    pub fn mark(&self) -> usize {
        self.undo.len()
    }

    pub fn rollback(&mut self, mark: usize) {
        while self.undo.len() > mark {
            match self.undo.pop() {
                Some(Undo::Capture(index, old)) => self.captures[index] = old,
                Some(Undo::MatchStart(old)) => self.match_start = old,
                Some(Undo::MatchEnd(old)) => self.match_end = old,
                None => break,
            }
        }
    }

    pub fn capture(&self, index: usize) -> Option<Range<usize>> {
        self.captures.get(index).cloned().flatten()
    }

    pub fn set_capture(&mut self, index: usize, range: Range<usize>) {
        if let Some(slot) = self.captures.get_mut(index) {
            let old = slot.replace(range);
            self.undo.push(Undo::Capture(index, old));
        }
    }

    /// The last `\zs` on the path wins.
    pub fn set_match_start(&mut self, pos: usize) {
        let old = self.match_start.replace(pos);
        self.undo.push(Undo::MatchStart(old));
    }

    /// The first `\ze` on the path wins.
    pub fn set_match_end(&mut self, pos: usize) {
        if self.match_end.is_none() {
            self.match_end = Some(pos);
            self.undo.push(Undo::MatchEnd(None));
        }
    }

    pub fn match_start(&self) -> Option<usize> {
        self.match_start
    }

    pub fn match_end(&self) -> Option<usize> {
        self.match_end
    }

    pub fn into_captures(self) -> Vec<Option<Range<usize>>> {
        self.captures
    }

    /// Counts one backtrack against the limit.
    pub fn step(&mut self) -> Result<(), MatchError> {
        self.steps += 1;
        if self.steps > self.limits.backtrack_limit {
            warn!(
                limit = self.limits.backtrack_limit,
                "backtrack limit exceeded"
            );
            return Err(MatchError::BacktrackLimitExceeded {
                limit: self.limits.backtrack_limit,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn steps(&self) -> usize {
        self.steps
    }
}
