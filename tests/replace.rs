use rift_pattern::{Repl, Substitution, compile, replace};

#[track_caller]
fn assert_replace(pattern: &str, flags: &str, text: &str, repl: &Repl<'_>, expected: (&str, usize)) {
    let compiled = compile(pattern, flags).unwrap();
    let (result, count) = compiled.replace(text, repl).unwrap();
    assert_eq!((result.as_str(), count), expected);
}

#[test]
fn test_replace_first_and_global() {
    let repl = Repl::Template("o");
    assert_replace("a", "", "banana", &repl, ("bonana", 1));
    assert_replace("a", "g", "banana", &repl, ("bonono", 3));
    assert_replace("x", "g", "banana", &repl, ("banana", 0));
}

#[test]
fn test_replace_all_ignores_global_flag() {
    let pattern = compile(r"\w+", "").unwrap();
    let (result, count) = pattern
        .replace_all("hello world", &Repl::Template("word"))
        .unwrap();
    assert_eq!(result, "word word");
    assert_eq!(count, 2);
}

#[test]
fn test_replace_template_groups() {
    assert_replace(
        r"(\w+)=(\w+)",
        "g",
        "a=1, b=2",
        &Repl::Template(r"\2=\1"),
        ("1=a, 2=b", 2),
    );
    assert_replace(r"\d+", "g", "a1b22", &Repl::Template(r"<\0>"), ("a<1>b<22>", 2));
    assert_replace("a(x)?", "", "ab", &Repl::Template(r"[\1]"), ("[]b", 1));
    assert_replace("a", "", "a", &Repl::Template(r"\\"), (r"\", 1));
    assert_replace("a", "", "a", &Repl::Template(r"\n\9"), (r"\n", 1));
}

#[test]
fn test_replace_function() {
    let upper = Repl::function(|found, text| found.as_str(text).to_uppercase());
    assert_replace(r"\<\w", "g", "hello big world", &upper, ("Hello Big World", 3));

    let lengths = Repl::function(|found, _| found.len().to_string());
    assert_replace(r"\w+", "g", "ab c", &lengths, ("2 1", 2));
}

#[test]
fn test_replace_empty_matches() {
    let repl = Repl::Template("-");
    assert_replace("x*", "g", "abc", &repl, ("-a-b-c-", 4));
    assert_replace("x*", "g", "", &repl, ("-", 1));
    assert_replace("b*", "g", "abc", &repl, ("-a--c-", 4));
}

#[test]
fn test_replace_with_span_override() {
    assert_replace(r"foo\zsbar", "g", "foobar bar", &Repl::Template("X"), ("fooX bar", 1));
}

#[test]
fn test_replace_limit() {
    let pattern = compile("a", "").unwrap();
    let (result, count) = replace(&pattern, "aaaa", &Repl::Template("b"), Some(2)).unwrap();
    assert_eq!(result, "bbaa");
    assert_eq!(count, 2);
}

#[test]
fn test_piecewise_substitution() {
    let pattern = compile(r"\d", "").unwrap();
    let mut substitution = Substitution::new(&pattern, "1 2 3", None, None);
    while let Some(found) = substitution.next_match().unwrap() {
        if found.as_str("1 2 3") == "2" {
            substitution.replace(&found, None);
        } else {
            substitution.replace(&found, Some("#"));
        }
    }
    assert_eq!(substitution.finish(), ("# 2 #".to_owned(), 3));
}
