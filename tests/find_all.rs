use rift_pattern::{MatchError, PatternBuilder, PositionContext, compile, find_all};
use std::ops::Range;

fn spans(pattern: &str, flags: &str, text: &str) -> Vec<Range<usize>> {
    let pattern = compile(pattern, flags).unwrap();
    find_all(&pattern, text, None)
        .map(|found| found.unwrap().range())
        .collect()
}

#[test]
fn test_find_all_basic() {
    assert_eq!(spans("a", "", "aaa"), vec![0..1, 1..2, 2..3]);
    assert_eq!(spans("an", "", "banana"), vec![1..3, 3..5]);
    assert_eq!(spans(r"\d+", "", "1 22 333"), vec![0..1, 2..4, 5..8]);
    assert_eq!(spans("x", "", "abc"), vec![]);
}

#[test]
fn test_find_all_empty_matches() {
    assert_eq!(spans("a*", "", ""), vec![0..0]);
    assert_eq!(spans("a*", "", "baa"), vec![0..0, 1..3, 3..3]);
    assert_eq!(spans("", "", "ab"), vec![0..0, 1..1, 2..2]);
    assert_eq!(spans("", "", "é"), vec![0..0, 2..2]);
    assert_eq!(spans(r"\b", "", "ab cd"), vec![0..0, 2..2, 3..3, 5..5]);
}

#[test]
fn test_find_all_multiline() {
    assert_eq!(spans(r"^\w", "m", "ab\ncd\nef"), vec![0..1, 3..4, 6..7]);
    assert_eq!(spans(r"^\w", "", "ab\ncd\nef"), vec![0..1]);
}

#[test]
fn test_find_all_match_start() {
    assert_eq!(spans(r"a\zsb", "", "ababab"), vec![1..2, 3..4, 5..6]);
    assert_eq!(spans(r"(?<=a\zs)", "", "aa"), vec![1..1, 2..2]);
}

#[test]
fn test_matches_honours_global_flag() {
    let text = "a1b2c3";
    let first = compile(r"\d", "").unwrap();
    let all = compile(r"\d", "g").unwrap();
    assert_eq!(first.matches(text).count(), 1);
    assert_eq!(all.matches(text).count(), 3);
    assert_eq!(first.find_all(text).count(), 3);
}

#[test]
fn test_find_all_limit_and_position() {
    let pattern = compile("o", "").unwrap();
    let mut matches = pattern.find_all("foo boo").limit(3);
    assert_eq!(matches.position(), 0);
    assert_eq!(matches.next().unwrap().unwrap().start(), 1);
    assert_eq!(matches.position(), 2);
    assert_eq!(matches.by_ref().count(), 2);
    assert!(matches.next().is_none());
}

#[test]
fn test_find_all_with_context() {
    let text = "x\nx\nx";
    let pattern = compile(r"\%2lx|\%3lx", "").unwrap();
    let context = PositionContext::for_text(text);
    let starts: Vec<usize> = pattern
        .find_all_with_context(text, &context)
        .map(|found| found.unwrap().start())
        .collect();
    assert_eq!(starts, vec![2, 4]);
}

#[test]
fn test_find_all_stops_on_error() {
    let pattern = PatternBuilder::new()
        .backtrack_limit(50)
        .build("(a|aa)*c")
        .unwrap();
    let mut matches = pattern.find_all("aaaaaaaaaaaaaaaaaaaa");
    assert_eq!(
        matches.next(),
        Some(Err(MatchError::BacktrackLimitExceeded { limit: 50 }))
    );
    assert_eq!(matches.next(), None);

    let pattern = compile(r"\%5l", "g").unwrap();
    let results: Vec<_> = pattern.matches("abc").collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}
