use super::{state::State, *};
use crate::{ast::parse_pattern, flags::MatchOptions};

fn search(pattern: &str, flags: &str, input: &str) -> Result<Option<MatchRanges>, MatchError> {
    search_with(pattern, flags, input, &Limits::default(), None)
}

fn search_with(
    pattern: &str,
    flags: &str,
    input: &str,
    limits: &Limits,
    context: Option<&PositionContext<'_>>,
) -> Result<Option<MatchRanges>, MatchError> {
    let options = MatchOptions::from_flags(flags, pattern).unwrap();
    let ast = parse_pattern(pattern, &options).unwrap();
    find_at(&ast, &options, limits, input, 0, context)
}

fn span(pattern: &str, flags: &str, input: &str) -> Option<Range<usize>> {
    search(pattern, flags, input).unwrap().map(|ranges| ranges.span)
}

#[test]
fn undo_log_restores_captures() {
    let mut state = State::new(2, Limits::default());
    state.set_capture(1, 0..2);
    let mark = state.mark();
    state.set_capture(1, 3..4);
    state.set_capture(2, 4..5);
    state.set_match_start(3);
    assert_eq!(state.capture(1), Some(3..4));

    state.rollback(mark);
    assert_eq!(state.capture(1), Some(0..2));
    assert_eq!(state.capture(2), None);
    assert_eq!(state.match_start(), None);
}

#[test]
fn first_match_end_is_kept() {
    let mut state = State::new(0, Limits::default());
    state.set_match_end(2);
    let mark = state.mark();
    state.set_match_end(5);
    assert_eq!(state.match_end(), Some(2));
    state.rollback(mark);
    assert_eq!(state.match_end(), Some(2));
}

#[test]
fn step_budget() {
    let mut state = State::new(
        0,
        Limits {
            backtrack_limit: 2,
            ..Limits::default()
        },
    );
    assert!(state.step().is_ok());
    assert!(state.step().is_ok());
    assert_eq!(state.steps(), 2);
    assert_eq!(
        state.step(),
        Err(MatchError::BacktrackLimitExceeded { limit: 2 })
    );
}

#[test]
fn line_map() {
    let map = LineMap::new("ab\nçd\n");
    assert_eq!(map.locate(0), (1, 1));
    assert_eq!(map.locate(2), (1, 3));
    assert_eq!(map.locate(3), (2, 1));
    assert_eq!(map.locate(5), (2, 2));
    assert_eq!(map.locate(7), (3, 1));
    assert_eq!(map.locate(100), (3, 1));
}

#[test]
fn greedy_and_lazy() {
    assert_eq!(span("a*", "", "aaa"), Some(0..3));
    assert_eq!(span("a*?", "", "aaa"), Some(0..0));
    assert_eq!(span("a+?", "", "aaa"), Some(0..1));
    assert_eq!(span("a{,3}", "", "aaaa"), Some(0..3));
    assert_eq!(span("a{2,4}?", "", "aaaa"), Some(0..2));
    assert_eq!(span("ba??", "", "ba"), Some(0..1));
}

#[test]
fn quantified_groups_backtrack() {
    assert_eq!(span("(ab)*abc", "", "abababc"), Some(0..7));
    assert_eq!(span("(a|ab)(c|bcd)", "", "abcd"), Some(0..4));
    assert_eq!(span("(?:ab)+?b", "", "ababb"), Some(0..5));
}

#[test]
fn nested_empty_loops_terminate() {
    assert_eq!(span("(a*)*", "", "b"), Some(0..0));
    assert_eq!(span("(a*)+b", "", "aab"), Some(0..3));
    assert_eq!(span("(a?){3}", "", ""), Some(0..0));
}

#[test]
fn captures_follow_successful_path() {
    let ranges = search("(a)|(b)", "", "b").unwrap().unwrap();
    assert_eq!(ranges.captures, vec![Some(0..1), None, Some(0..1)]);

    let ranges = search("(a)*", "", "aa").unwrap().unwrap();
    assert_eq!(ranges.captures, vec![Some(0..2), Some(1..2)]);
}

#[test]
fn match_start_and_end_override_span() {
    let ranges = search(r"foo\zsbar\zebaz", "", "foobarbaz").unwrap().unwrap();
    assert_eq!(ranges.span, 3..6);
    assert_eq!(ranges.captures[0], Some(3..6));
    assert_eq!(span(r"foo\zsbar\zebaz", "", "foobarbax"), None);
}

#[test]
fn lookbehind_is_variable_width() {
    assert_eq!(span(r"(?<=a+)b", "", "xaab"), Some(3..4));
    assert_eq!(span(r"(?<!a+)b", "", "xaab"), None);
    assert_eq!(span(r"(?<=^\w*)c", "", "abc"), Some(2..3));
}

#[test]
fn lookahead_keeps_captures() {
    let ranges = search(r"a(?>=(b))", "", "ab").unwrap().unwrap();
    assert_eq!(ranges.span, 0..1);
    assert_eq!(ranges.captures[1], Some(1..2));
}

#[test]
fn position_anchors_need_context() {
    assert_eq!(
        search(r"\%2lx", "", "a\nx"),
        Err(MatchError::MissingContext(Anchor::AtLine(2)))
    );

    let text = "a\nx";
    let context = PositionContext::for_text(text);
    let found = search_with(r"\%2lx", "", text, &Limits::default(), Some(&context)).unwrap();
    assert_eq!(found.map(|ranges| ranges.span), Some(2..3));

    assert_eq!(
        search_with(r"\%#x", "", text, &Limits::default(), Some(&context)),
        Err(MatchError::MissingContext(Anchor::AtCursor))
    );
}

#[test]
fn backtrack_limit_aborts() {
    let limits = Limits {
        backtrack_limit: 1_000,
        ..Limits::default()
    };
    assert_eq!(
        search_with("(a*)*b", "", "aaaaaaaaaaaaaaaaaaaa", &limits, None),
        Err(MatchError::BacktrackLimitExceeded { limit: 1_000 })
    );
}

#[test]
fn depth_limit_counts_pattern_nesting() {
    let limits = Limits {
        max_depth: 10,
        ..Limits::default()
    };
    assert_eq!(
        search_with("(((((((((((a)))))))))))", "", "a", &limits, None),
        Err(MatchError::DepthLimitExceeded { limit: 10 })
    );

    let input = "a".repeat(1_000);
    let found = search_with("(a)*", "", &input, &limits, None).unwrap();
    assert_eq!(found.map(|ranges| ranges.span), Some(0..1_000));
}

#[test]
fn budget_is_per_start_offset() {
    let limits = Limits {
        backtrack_limit: 10,
        ..Limits::default()
    };
    let input = "b".repeat(100);
    assert_eq!(search_with("a|bc", "", &input, &limits, None), Ok(None));
}

#[test]
fn single_char_loops_use_one_choice_point() {
    let limits = Limits {
        backtrack_limit: 3,
        ..Limits::default()
    };
    let input = "a".repeat(10_000);
    let found = search_with("a*a", "", &input, &limits, None).unwrap();
    assert_eq!(found.map(|ranges| ranges.span), Some(0..10_000));
    let found = search_with("a*?$", "", &input, &Limits::default(), None).unwrap();
    assert_eq!(found.map(|ranges| ranges.span), Some(0..10_000));
}

#[test]
fn search_starts_at_char_boundaries() {
    let options = MatchOptions::from_flags("", "b").unwrap();
    let ast = parse_pattern("b", &options).unwrap();
    let found = find_at(&ast, &options, &Limits::default(), "ébé", 1, None).unwrap();
    assert_eq!(found.map(|ranges| ranges.span), Some(2..3));
    let past_end = find_at(&ast, &options, &Limits::default(), "b", 5, None).unwrap();
    assert_eq!(past_end, None);
}
