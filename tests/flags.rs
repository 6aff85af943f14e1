use rift_pattern::{CaseMode, Error, MatchOptions, Pattern, compile, parse_flags, split_delimited};

#[test]
fn test_defaults() {
    let options = parse_flags("", "abc").unwrap();
    assert_eq!(options.case_mode, CaseMode::Smart);
    assert!(options.ignore_case);
    assert!(!options.multiline);
    assert!(!options.dotall);
    assert!(!options.verbose);
    assert!(!options.unicode);
    assert!(!options.global);
}

#[test]
fn test_every_flag() {
    let options = parse_flags("imsxug", "abc").unwrap();
    assert_eq!(options.case_mode, CaseMode::Insensitive);
    assert!(options.ignore_case);
    assert!(options.multiline);
    assert!(options.dotall);
    assert!(options.verbose);
    assert!(options.unicode);
    assert!(options.global);
}

#[test]
fn test_smartcase() {
    assert!(parse_flags("", "foo").unwrap().ignore_case);
    assert!(!parse_flags("", "Foo").unwrap().ignore_case);
    assert!(parse_flags("", r"\W\S\D").unwrap().ignore_case);
    assert!(parse_flags("", r"(?<Name>x)\k<Name>").unwrap().ignore_case);
    assert!(!parse_flags("", "[A-Z]").unwrap().ignore_case);
}

#[test]
fn test_smartcase_ignores_verbose_comments() {
    assert!(parse_flags("x", "foo # Note").unwrap().ignore_case);
    assert!(!parse_flags("", "foo # Note").unwrap().ignore_case);
    assert!(!parse_flags("x", "foo # note\nBar").unwrap().ignore_case);

    let pattern = compile("foo # Note", "x").unwrap();
    assert_eq!(pattern.find("a FOO").unwrap().map(|found| found.range()), Some(2..5));
}

#[test]
fn test_case_flags_last_wins() {
    let options = parse_flags("ic", "foo").unwrap();
    assert_eq!(options.case_mode, CaseMode::Sensitive);
    assert!(!options.ignore_case);

    let options = parse_flags("ci", "Foo").unwrap();
    assert_eq!(options.case_mode, CaseMode::Insensitive);
    assert!(options.ignore_case);
}

#[test]
fn test_invalid_flag() {
    assert_eq!(parse_flags("iq", "a"), Err(Error::InvalidFlag('q')));
    assert_eq!(compile("a", "G").unwrap_err(), Error::InvalidFlag('G'));
}

#[test]
fn test_split_delimited() {
    assert_eq!(split_delimited("foo/gi"), Ok(("foo", "gi")));
    assert_eq!(split_delimited("a/b/"), Ok(("a/b", "")));
    assert_eq!(split_delimited("/"), Ok(("", "")));
    assert_eq!(split_delimited("foo"), Err(Error::MissingDelimiter));
}

#[test]
fn test_from_delimited() {
    let pattern = Pattern::from_delimited("Foo/i").unwrap();
    assert_eq!(pattern.pattern(), "Foo");
    assert!(pattern.options().ignore_case);
    assert!(pattern.is_match("xfoo").unwrap());

    assert_eq!(
        Pattern::from_delimited("foo").unwrap_err(),
        Error::MissingDelimiter
    );
}

#[test]
fn test_options_are_independent_per_pattern() {
    let strict = compile("Foo", "").unwrap();
    let loose = compile("Foo", "i").unwrap();
    assert!(!strict.is_match("FOO").unwrap());
    assert!(loose.is_match("FOO").unwrap());
    assert_eq!(
        MatchOptions::from_flags("m", "x").unwrap(),
        parse_flags("m", "x").unwrap()
    );
}
