//! Integration tests for the SEARCH query builder.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;

use mailkit_imap::search::parse_size;
use mailkit_imap::{Command, Error, QueryBuilder, SearchToken};

#[test]
fn size_table() {
    for (input, bytes) in [
        ("1kb", 1_000),
        ("5 Megabytes", 5_000_000),
        ("3Gigabyte", 3_000_000_000),
        ("10", 10),
    ] {
        assert_eq!(parse_size(input).unwrap(), bytes, "{input}");
    }

    for input in ["5 boobabytes", "5.5 GB", "5 GBKB"] {
        assert!(
            matches!(parse_size(input), Err(Error::SizeParsing { .. })),
            "{input} should be rejected"
        );
    }
}

#[test]
fn dates() {
    assert!(QueryBuilder::new().since("1-Jan-2023").is_ok());
    assert!(QueryBuilder::new().sent_on("31-Dec-2023").is_ok());
    assert!(matches!(
        QueryBuilder::new().on("2023-01-01"),
        Err(Error::WrongDateFormat { .. })
    ));
    assert!(matches!(
        QueryBuilder::new().sent_before("invalid"),
        Err(Error::WrongDateFormat { .. })
    ));

    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let query = QueryBuilder::new().before(date).unwrap().query().unwrap();
    assert_eq!(query.to_string(), "BEFORE 5-Mar-2024");
}

#[test]
fn charset_prefix_for_single_non_ascii_value() {
    let query = QueryBuilder::new()
        .subject("テスト")
        .sender("test@example.com")
        .query()
        .unwrap();

    assert_eq!(
        query.to_strings(),
        ["CHARSET", "UTF-8", "SUBJECT", "テスト", "FROM", "\"test@example.com\""]
    );
}

#[test]
fn two_non_ascii_values_fail_at_finalization() {
    let builder = QueryBuilder::new().subject("Привет").text("テスト").unseen();
    assert!(matches!(
        builder.query(),
        Err(Error::SearchSyntaxNotSupported { ref values }) if values.len() == 2
    ));
}

#[test]
fn every_search_key() {
    let query = QueryBuilder::new()
        .sender("a")
        .answered()
        .bcc("b")
        .before("1-Jan-2024")
        .unwrap()
        .body("c")
        .cc("d")
        .deleted()
        .draft()
        .flagged()
        .header("X-Tag", "e")
        .keyword("f")
        .larger(10u64)
        .unwrap()
        .new_messages()
        .old()
        .on("2-Jan-2024")
        .unwrap()
        .recent()
        .seen()
        .sent_before("3-Jan-2024")
        .unwrap()
        .sent_on("4-Jan-2024")
        .unwrap()
        .sent_since("5-Jan-2024")
        .unwrap()
        .since("6-Jan-2024")
        .unwrap()
        .smaller("2 kb")
        .unwrap()
        .subject("g")
        .text("h")
        .recipient("i")
        .uid("1:*")
        .unanswered()
        .undeleted()
        .undraft()
        .unflagged()
        .unkeyword("j")
        .unseen()
        .query()
        .unwrap();

    assert_eq!(
        query.to_string(),
        "FROM a ANSWERED BCC b BEFORE 1-Jan-2024 BODY c CC d DELETED DRAFT FLAGGED \
         HEADER X-Tag e KEYWORD f LARGER 10 NEW OLD ON 2-Jan-2024 RECENT SEEN \
         SENTBEFORE 3-Jan-2024 SENTON 4-Jan-2024 SENTSINCE 5-Jan-2024 SINCE 6-Jan-2024 \
         SMALLER 2000 SUBJECT g TEXT h TO i UID 1:* UNANSWERED UNDELETED UNDRAFT \
         UNFLAGGED UNKEYWORD j UNSEEN"
    );
}

#[test]
fn search_command_sends_non_ascii_as_literal() {
    let query = QueryBuilder::new().subject("Café").unseen().query().unwrap();
    let cmd = Command::Search { query, uid: true };

    let mut expected = b"A0001 UID SEARCH CHARSET UTF-8 SUBJECT {5+}\r\n".to_vec();
    expected.extend_from_slice("Café".as_bytes());
    expected.extend_from_slice(b" UNSEEN\r\n");
    assert_eq!(cmd.serialize("A0001"), expected);
}

#[test]
fn search_command_keeps_empty_value_as_quoted_string() {
    let query = QueryBuilder::new().subject("").unseen().query().unwrap();
    let cmd = Command::Search { query, uid: true };

    assert_eq!(
        cmd.serialize("A0001"),
        b"A0001 UID SEARCH SUBJECT \"\" UNSEEN\r\n"
    );
}

#[derive(Debug, Clone)]
enum Key {
    Subject(String),
    Seen,
    Larger(u32),
    Since(u32),
}

fn apply(builder: QueryBuilder, key: &Key) -> QueryBuilder {
    match key {
        Key::Subject(s) => builder.subject(s),
        Key::Seen => builder.seen(),
        Key::Larger(n) => builder.larger(*n).unwrap(),
        Key::Since(day) => builder.since(format!("{day}-Feb-2024")).unwrap(),
    }
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-z @()]{1,12}".prop_map(Key::Subject),
        Just(Key::Seen),
        any::<u32>().prop_map(Key::Larger),
        (1u32..=29).prop_map(Key::Since),
    ]
}

proptest! {
    #[test]
    fn same_chain_same_tokens(keys in prop::collection::vec(key_strategy(), 0..10)) {
        let first = keys.iter().fold(QueryBuilder::new(), apply).query().unwrap();
        let second = keys.iter().fold(QueryBuilder::new(), apply).query().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ascii_chains_have_no_charset(keys in prop::collection::vec(key_strategy(), 0..10)) {
        let query = keys.iter().fold(QueryBuilder::new(), apply).query().unwrap();
        prop_assert!(query.charset().is_none());
        let is_charset = |t: &SearchToken| t.as_str() == Some("CHARSET");
        prop_assert!(!query.tokens().iter().any(is_charset));
    }
}
