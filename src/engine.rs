//! The backtracking matcher.
//!
//! Matching is written in continuation-passing style: every node is run
//! together with a [`Cont`] describing what must match after it, so each
//! choice point can try the whole rest of the pattern before committing.
//! Choice points live on an explicit stack rather than the call stack, so
//! the length of the input never affects how deeply the matcher recurses.
//! Only lookaround nests a search inside another.

use super::{
    ast::{Anchor, AstRoot, LookDirection, Node, Repetition},
    charset::{chars_eq, is_word_char},
    flags::MatchOptions,
};
use std::{ops::Range, rc::Rc};
use tracing::{trace, warn};

pub mod context;
mod state;

#[cfg(test)]
mod tests;

pub use context::{LineMap, PositionContext};
use state::State;

/// Resource limits for a single search.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// The number of times a match attempt at one start offset may backtrack
    /// before the search is abandoned with
    /// [`MatchError::BacktrackLimitExceeded`].
    pub backtrack_limit: usize,
    /// The deepest pattern nesting a search accepts. Deeper patterns fail
    /// with [`MatchError::DepthLimitExceeded`] before any matching.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            backtrack_limit: 1_000_000,
            max_depth: 500,
        }
    }
}

/// An error raised while searching with a compiled pattern.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// The pattern has a position anchor but no [`PositionContext`] (or no
    /// cursor, for `\%#`) was supplied.
    #[error("pattern uses '{0}' but no position context was supplied")]
    MissingContext(Anchor),
    /// A match attempt backtracked more often than allowed.
    #[error("backtrack limit of {limit} exceeded")]
    BacktrackLimitExceeded { limit: usize },
    /// The pattern nests deeper than allowed.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

/// The byte ranges of a successful match.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct MatchRanges {
    /// The reported span, after `\zs` and `\ze` are applied.
    pub span: Range<usize>,
    /// Capture slots indexed by group number. Slot 0 is the span.
    pub captures: Vec<Option<Range<usize>>>,
}

/// Finds the leftmost match of `ast` in `input` starting at or after the byte
/// offset `from`.
pub(crate) fn find_at(
    ast: &AstRoot,
    options: &MatchOptions,
    limits: &Limits,
    input: &str,
    from: usize,
    context: Option<&PositionContext<'_>>,
) -> Result<Option<MatchRanges>, MatchError> {
    check_context(ast, context)?;

    if ast.depth() > limits.max_depth {
        warn!(depth = ast.depth(), limit = limits.max_depth, "pattern nests too deeply");
        return Err(MatchError::DepthLimitExceeded {
            limit: limits.max_depth,
        });
    }

    if from > input.len() {
        return Ok(None);
    }

    let mut matcher = Matcher {
        input,
        options: *options,
        context,
        state: State::new(ast.capture_count(), *limits),
        choices: Vec::new(),
    };
    let anchored = ast.is_anchored_start(options.multiline);

    for start in (from..=input.len()).filter(|&at| input.is_char_boundary(at)) {
        if anchored && start > 0 {
            break;
        }

        trace!(start, "trying match");
        matcher.state.reset();
        matcher.choices.clear();
        if let Some(end) = matcher.solve(ast, start, None)? {
            return Ok(Some(matcher.into_ranges(start, end)));
        }
    }

    Ok(None)
}

/// Position anchors cannot be evaluated without their context, so their
/// absence is reported before any matching is done.
fn check_context(ast: &AstRoot, context: Option<&PositionContext<'_>>) -> Result<(), MatchError> {
    let missing = |anchor: Anchor| match anchor {
        Anchor::AtLine(_) | Anchor::AtColumn(_) => context.is_none(),
        Anchor::AtCursor => context.and_then(PositionContext::cursor).is_none(),
        _ => false,
    };

    match ast.find_anchor(&missing) {
        Some(anchor) => Err(MatchError::MissingContext(anchor)),
        None => Ok(()),
    }
}

/// A piece of work waiting on the continuation.
#[derive(Clone, Copy)]
enum Goal<'a> {
    /// Match a node.
    Node(&'a Node),
    /// Match the remaining items of a concatenation.
    Seq(&'a [Node]),
    /// A capturing group that started at `start` is complete.
    Close { index: usize, start: usize },
    /// One iteration of a quantified item, started at `iter_start`, is
    /// complete.
    Repeat {
        item: &'a Node,
        repetition: Repetition,
        count: usize,
        iter_start: usize,
        zero_run: usize,
    },
}

/// What remains to be matched: a shared list of goals, `None` when the
/// (sub)pattern is complete.
type Cont<'a> = Option<Rc<Frame<'a>>>;

struct Frame<'a> {
    goal: Goal<'a>,
    next: Cont<'a>,
}

fn push<'a>(goal: Goal<'a>, next: &Cont<'a>) -> Cont<'a> {
    Some(Rc::new(Frame {
        goal,
        next: next.clone(),
    }))
}

/// A position and the continuation to run from it.
type Thread<'a> = Option<(usize, Cont<'a>)>;

/// A saved alternative to return to when the current path fails.
struct Choice<'a> {
    pos: usize,
    cont: Cont<'a>,
    /// The undo log length when the choice was made.
    mark: usize,
    alt: Alt<'a>,
}

enum Alt<'a> {
    /// Run the saved continuation from the saved position.
    Resume,
    /// Give back the last character of a greedy single-character repetition
    /// that matched `count` times.
    GiveBack { count: usize, min: usize },
    /// Take one more character for a lazy single-character repetition that
    /// matched `count` times.
    TakeMore {
        item: &'a Node,
        repetition: Repetition,
        count: usize,
    },
}

struct Matcher<'a> {
    input: &'a str,
    options: MatchOptions,
    context: Option<&'a PositionContext<'a>>,
    state: State,
    choices: Vec<Choice<'a>>,
}

impl<'a> Matcher<'a> {
    fn into_ranges(self, start: usize, end: usize) -> MatchRanges {
        let span_start = self.state.match_start().unwrap_or(start);
        let span_end = self.state.match_end().unwrap_or(end).max(span_start);
        let span = span_start..span_end;

        let mut captures = self.state.into_captures();
        captures[0] = Some(span.clone());

        MatchRanges { span, captures }
    }

    /// Matches `node` at `pos`, returning the end offset of the first
    /// successful path. With `end` set, only a path ending exactly there
    /// succeeds.
    ///
    /// The choice points made on the way are discarded once this returns, so
    /// the match is atomic. A failed attempt can leave state writes behind;
    /// callers roll back to a mark taken before the call.
    fn solve(
        &mut self,
        node: &'a Node,
        pos: usize,
        end: Option<usize>,
    ) -> Result<Option<usize>, MatchError> {
        let base = self.choices.len();
        let mut thread = self.enter(node, pos, &None)?;

        loop {
            let (pos, cont) = match thread {
                Some(thread) => thread,
                None => match self.backtrack(base)? {
                    Some(thread) => thread,
                    None => return Ok(None),
                },
            };

            thread = match cont {
                Some(frame) => self.advance(frame.goal, pos, &frame.next)?,
                None if end.is_none_or(|end| end == pos) => {
                    self.choices.truncate(base);
                    return Ok(Some(pos));
                }
                None => None,
            };
        }
    }

    /// Pops choice points above `base` until one yields a new thread.
    fn backtrack(&mut self, base: usize) -> Result<Thread<'a>, MatchError> {
        while self.choices.len() > base {
            let Some(choice) = self.choices.pop() else {
                break;
            };
            self.state.step()?;
            self.state.rollback(choice.mark);

            let resumed = match choice.alt {
                Alt::Resume => Some(choice.pos),
                Alt::GiveBack { count, min } => {
                    let last = self.input[..choice.pos]
                        .chars()
                        .next_back()
                        .map_or(0, char::len_utf8);
                    let pos = choice.pos - last;
                    if count - 1 > min {
                        self.choices.push(Choice {
                            pos,
                            cont: choice.cont.clone(),
                            mark: choice.mark,
                            alt: Alt::GiveBack {
                                count: count - 1,
                                min,
                            },
                        });
                    }
                    Some(pos)
                }
                Alt::TakeMore {
                    item,
                    repetition,
                    count,
                } => self.match_char(item, choice.pos).inspect(|&pos| {
                    if repetition.allows(count + 1) {
                        self.choices.push(Choice {
                            pos,
                            cont: choice.cont.clone(),
                            mark: choice.mark,
                            alt: Alt::TakeMore {
                                item,
                                repetition,
                                count: count + 1,
                            },
                        });
                    }
                }),
            };

            if let Some(pos) = resumed {
                return Ok(Some((pos, choice.cont)));
            }
        }
        Ok(None)
    }

    /// Saves `cont` at `pos` as an alternative to the current path.
    fn choose(&mut self, pos: usize, cont: Cont<'a>) {
        self.choices.push(Choice {
            pos,
            cont,
            mark: self.state.mark(),
            alt: Alt::Resume,
        });
    }

    fn advance(
        &mut self,
        goal: Goal<'a>,
        pos: usize,
        next: &Cont<'a>,
    ) -> Result<Thread<'a>, MatchError> {
        match goal {
            Goal::Node(node) => self.enter(node, pos, next),
            Goal::Seq(nodes) => self.seq(nodes, pos, next),
            Goal::Close { index, start } => {
                self.state.set_capture(index, start..pos);
                Ok(Some((pos, next.clone())))
            }
            Goal::Repeat {
                item,
                repetition,
                count,
                iter_start,
                zero_run,
            } => {
                let zero_run = if pos == iter_start { zero_run + 1 } else { 0 };
                Ok(self.repeat(item, repetition, count, pos, zero_run, next))
            }
        }
    }

    /// Starts matching `node` at `pos` with the continuation `next`.
    fn enter(
        &mut self,
        node: &'a Node,
        pos: usize,
        next: &Cont<'a>,
    ) -> Result<Thread<'a>, MatchError> {
        Ok(match node {
            Node::Literal(_) | Node::Any | Node::Class(..) | Node::Set(_) => self
                .match_char(node, pos)
                .map(|after| (after, next.clone())),

            Node::Concat(nodes) => return self.seq(nodes, pos, next),

            Node::Alternation(branches) => {
                let Some((first, rest)) = branches.split_first() else {
                    return Ok(Some((pos, next.clone())));
                };
                for branch in rest.iter().rev() {
                    self.choose(pos, push(Goal::Node(branch), next));
                }
                Some((pos, push(Goal::Node(first), next)))
            }

            Node::Group { inner, capture } => {
                let next = match capture.index() {
                    Some(index) => push(Goal::Close { index, start: pos }, next),
                    None => next.clone(),
                };
                Some((pos, push(Goal::Node(inner.as_ref()), &next)))
            }

            Node::Quantified { item, repetition } => {
                if is_single_char(item) {
                    self.repeat_single(item, *repetition, pos, next)
                } else {
                    self.repeat(item, *repetition, 0, pos, 0, next)
                }
            }

            Node::Anchor(anchor) => self
                .assert_anchor(*anchor, pos)?
                .then(|| (pos, next.clone())),

            Node::Backreference(index) => self
                .state
                .capture(*index)
                .and_then(|captured| self.match_text(captured, pos))
                .map(|after| (after, next.clone())),

            Node::Lookaround {
                inner,
                direction,
                negated,
            } => {
                let mark = self.state.mark();
                let found = match direction {
                    LookDirection::Ahead => self.solve(inner, pos, None)?.is_some(),
                    LookDirection::Behind => self.look_behind(inner, pos)?,
                };
                // Only a matched positive lookaround keeps its captures.
                if !found || *negated {
                    self.state.rollback(mark);
                }
                (found != *negated).then(|| (pos, next.clone()))
            }
        })
    }

    /// Matches a concatenation. Leading items that cannot backtrack are
    /// matched in a loop.
    fn seq(
        &mut self,
        nodes: &'a [Node],
        mut pos: usize,
        next: &Cont<'a>,
    ) -> Result<Thread<'a>, MatchError> {
        let mut rest = nodes;

        while let Some((node, tail)) = rest.split_first() {
            match node {
                Node::Literal(_) | Node::Any | Node::Class(..) | Node::Set(_) => {
                    match self.match_char(node, pos) {
                        Some(after) => pos = after,
                        None => return Ok(None),
                    }
                }
                Node::Anchor(anchor) => {
                    if !self.assert_anchor(*anchor, pos)? {
                        return Ok(None);
                    }
                }
                _ => break,
            }
            rest = tail;
        }

        match rest {
            [] => Ok(Some((pos, next.clone()))),
            [node] => self.enter(node, pos, next),
            [node, tail @ ..] => self.enter(node, pos, &push(Goal::Seq(tail), next)),
        }
    }

    /// Repetition of an item that always consumes exactly one character. The
    /// alternatives are kept as a single choice point that gives back or takes
    /// one character at a time.
    fn repeat_single(
        &mut self,
        item: &'a Node,
        repetition: Repetition,
        pos: usize,
        next: &Cont<'a>,
    ) -> Thread<'a> {
        let mut count = 0;
        let mut at = pos;

        if repetition.greedy {
            while repetition.allows(count)
                && let Some(after) = self.match_char(item, at)
            {
                at = after;
                count += 1;
            }
            if count < repetition.min {
                return None;
            }
            if count > repetition.min {
                self.choices.push(Choice {
                    pos: at,
                    cont: next.clone(),
                    mark: self.state.mark(),
                    alt: Alt::GiveBack {
                        count,
                        min: repetition.min,
                    },
                });
            }
        } else {
            while count < repetition.min {
                at = self.match_char(item, at)?;
                count += 1;
            }
            if repetition.allows(count) {
                self.choices.push(Choice {
                    pos: at,
                    cont: next.clone(),
                    mark: self.state.mark(),
                    alt: Alt::TakeMore {
                        item,
                        repetition,
                        count,
                    },
                });
            }
        }

        Some((at, next.clone()))
    }

    /// The choice point of a general repetition after `count` iterations.
    /// `zero_run` counts the consecutive zero-width iterations just completed;
    /// after two of them the loop may only exit.
    fn repeat(
        &mut self,
        item: &'a Node,
        repetition: Repetition,
        count: usize,
        pos: usize,
        zero_run: usize,
        next: &Cont<'a>,
    ) -> Thread<'a> {
        let may_stop = count >= repetition.min || zero_run >= 2;
        let may_continue = zero_run < 2 && repetition.allows(count);
        let again = || {
            let after = Goal::Repeat {
                item,
                repetition,
                count: count + 1,
                iter_start: pos,
                zero_run,
            };
            push(Goal::Node(item), &push(after, next))
        };

        match (may_stop, may_continue) {
            (true, true) if repetition.greedy => {
                self.choose(pos, next.clone());
                Some((pos, again()))
            }
            (true, true) => {
                self.choose(pos, again());
                Some((pos, next.clone()))
            }
            (true, false) => Some((pos, next.clone())),
            (false, true) => Some((pos, again())),
            (false, false) => None,
        }
    }

    /// Tries start offsets from `pos` back to 0 for a match of `inner` that
    /// ends exactly at `pos`.
    fn look_behind(&mut self, inner: &'a Node, pos: usize) -> Result<bool, MatchError> {
        let mark = self.state.mark();
        for start in (0..=pos).rev() {
            if !self.input.is_char_boundary(start) {
                continue;
            }
            self.state.step()?;
            if self.solve(inner, start, Some(pos))?.is_some() {
                return Ok(true);
            }
            self.state.rollback(mark);
        }
        Ok(false)
    }

    /// Matches a single-character node at `pos`, returning the offset after
    /// the character.
    fn match_char(&self, node: &Node, pos: usize) -> Option<usize> {
        let c = self.input[pos..].chars().next()?;
        let hit = match node {
            Node::Literal(lit) => chars_eq(*lit, c, self.options.ignore_case),
            Node::Any => self.options.dotall || c != '\n',
            Node::Class(kind, negated) => kind.matches(c, *negated, self.options.unicode),
            Node::Set(set) => set.contains(c, self.options.unicode, self.options.ignore_case),
            _ => false,
        };
        hit.then(|| pos + c.len_utf8())
    }

    /// Matches the text of `captured` at `pos`.
    fn match_text(&self, captured: Range<usize>, pos: usize) -> Option<usize> {
        let mut input = self.input[pos..].chars();
        let mut at = pos;
        for expected in self.input[captured].chars() {
            let c = input.next()?;
            if !chars_eq(expected, c, self.options.ignore_case) {
                return None;
            }
            at += c.len_utf8();
        }
        Some(at)
    }

    /// Tests a zero-width assertion at `pos`. `\zs` and `\ze` always hold and
    /// record `pos` as the reported span bound.
    fn assert_anchor(&mut self, anchor: Anchor, pos: usize) -> Result<bool, MatchError> {
        let before = self.input[..pos].chars().next_back();
        let after = self.input[pos..].chars().next();
        let word_before = before.is_some_and(is_word_char);
        let word_after = after.is_some_and(is_word_char);
        let multiline = self.options.multiline;

        Ok(match anchor {
            Anchor::StartOfInput => pos == 0,
            Anchor::EndOfInput => pos == self.input.len(),
            Anchor::StartOfLine => pos == 0 || (multiline && before == Some('\n')),
            Anchor::EndOfLine => pos == self.input.len() || (multiline && after == Some('\n')),
            Anchor::WordStart => !word_before && word_after,
            Anchor::WordEnd => word_before && !word_after,
            Anchor::WordBoundary => word_before != word_after,
            Anchor::NonWordBoundary => word_before == word_after,
            Anchor::MatchStart => {
                self.state.set_match_start(pos);
                true
            }
            Anchor::MatchEnd => {
                self.state.set_match_end(pos);
                true
            }
            Anchor::AtLine(line) => self.locate(anchor, pos)?.0 == line,
            Anchor::AtColumn(column) => self.locate(anchor, pos)?.1 == column,
            Anchor::AtCursor => {
                let cursor = self
                    .context
                    .and_then(PositionContext::cursor)
                    .ok_or(MatchError::MissingContext(anchor))?;
                cursor == pos
            }
        })
    }

    fn locate(&self, anchor: Anchor, pos: usize) -> Result<(usize, usize), MatchError> {
        self.context
            .map(|context| context.locate(pos))
            .ok_or(MatchError::MissingContext(anchor))
    }
}

fn is_single_char(node: &Node) -> bool {
    matches!(
        node,
        Node::Literal(_) | Node::Any | Node::Class(..) | Node::Set(_)
    )
}
