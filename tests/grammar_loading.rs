//! Grammar loading tests
//!
//! Covers rule parsing, comment handling and every grammar diagnostic.

use lexdef::{ErrorKind, ErrorSource, Grammar, ParseError, Tag};
use rstest::rstest;

fn load(src: &str) -> Result<Grammar, ParseError> {
    src.parse()
}

#[test]
fn test_load_skips_comments_and_blanks() {
    let src = "#comment\n  \n\"\"(.*)\"\" string\n\"\\{\" @conc\n\t#indented comment\n  \"[0-9]*\" int  ";
    let grammar = load(src).unwrap();

    assert_eq!(grammar.len(), 3);

    let rules: Vec<(&str, &str)> = grammar
        .iter()
        .map(|m| (m.pattern(), m.tag().as_str()))
        .collect();
    assert_eq!(
        rules,
        vec![
            (r#""(.*)""#, "string"),
            (r"\{", "@conc"),
            ("[0-9]*", "int"),
        ]
    );
    assert_eq!(grammar.matchers()[1].tag(), &Tag::Conc);
}

#[test]
fn test_comments_and_blanks_do_not_change_the_table() {
    let bare = "\"[a-z]+\" word\n\"[0-9]+\" int\n\" \" @skip\n";
    let noisy = "# words\n\n  \"[a-z]+\" word\n# numbers\n\t\n\"[0-9]+\" int\n   # spaces\n\" \" @skip\n\n";

    assert_eq!(load(bare).unwrap(), load(noisy).unwrap());
}

#[rstest]
#[case::no_initial_quote(r#"line "must start with a" quote"#, ErrorKind::MisformattedLine)]
#[case::no_end_quote(r#""regexp must have an ending quote"#, ErrorKind::MisformattedLine)]
#[case::no_tag(r#""abc""#, ErrorKind::MisformattedLine)]
#[case::no_separator(r#""abc"tag"#, ErrorKind::MisformattedLine)]
#[case::two_tags(r#""foo" bar baz"#, ErrorKind::MisformattedTokenType)]
#[case::quote_in_tag("\"foo\" ba\"r", ErrorKind::MisformattedTokenType)]
#[case::multiple_captures(r#""(foo)(bar)" foobar"#, ErrorKind::MultipleCapturingGroups)]
#[case::reserved_tag(r#""foo" @strange"#, ErrorKind::ReservedTokenType("@strange".to_string()))]
#[case::reserved_lookalike(r#""y*" @weird"#, ErrorKind::ReservedTokenType("@weird".to_string()))]
fn test_rejected_rule(#[case] line: &str, #[case] expected: ErrorKind) {
    let err = load(line).unwrap_err();
    assert_eq!(err.source_kind(), ErrorSource::LangDef);
    assert_eq!(err.line(), Some(1));
    assert_eq!(err.kind(), &expected);
}

#[test]
fn test_bad_regexp_is_rejected() {
    let err = load(r#"".*)" badregexp"#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Regexp(_)));
    assert!(err.to_string().starts_with("Lang def: Line 1: Regexp:\n\t"));
}

#[test]
fn test_multiple_capture_message() {
    let err = load("\"a\" a\n\"(foo)(bar)\" foobar\n").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Lang def: Line 2: Multiple capturing groups exist in regexp");
}

#[test]
fn test_reserved_message() {
    let err = load(r#""y*" @weird"#).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Lang def: Line 1: Token type @weird is reserved");
}

#[test]
fn test_error_line_counts_comments_and_blanks() {
    let src = "# one\n\n\"a\" a\n# four\n\"b\" b c\n\"c\" c\n";
    let err = load(src).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Lang def: Line 5: Misformatted token type");
}

#[test]
fn test_loading_stops_at_first_error() {
    let src = "\"(a)(b)\" ab\nnot a rule\n";
    let err = load(src).unwrap_err();
    assert_eq!(err.line(), Some(1));
    assert_eq!(err.kind(), &ErrorKind::MultipleCapturingGroups);
}

#[test]
fn test_load_from_buffered_reader() {
    let reader = std::io::BufReader::new("\"x\" ex\n".as_bytes());
    let grammar = Grammar::load(reader).unwrap();
    assert_eq!(grammar.matchers()[0].tag(), &Tag::Named("ex".to_string()));
}
