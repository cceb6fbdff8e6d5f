//! Integration tests for folder hierarchy building.

#![allow(clippy::unwrap_used)]

use mailkit_imap::{
    Error, FolderHierarchy, MailboxAttribute, RawListing, Response, ResponseParser,
    UntaggedResponse,
};

#[test]
fn end_to_end_listing() {
    let hierarchy = FolderHierarchy::build([
        r#"(\HasNoChildren) "/" "INBOX""#,
        r#"(\HasChildren) "/" "Work""#,
        r#"(\HasNoChildren) "/" "Work/Projects""#,
    ])
    .unwrap();

    let (names, tree, index) = hierarchy.clone().into_parts();
    assert_eq!(names, ["INBOX", "Work", "Work/Projects"]);
    assert_eq!(index.get("Work"), ["Work/Projects"]);
    assert!(index.get("INBOX").is_empty());
    assert!(index.get("Work/Projects").is_empty());
    assert_eq!(hierarchy.parent_name("Work/Projects"), "Work");
    assert_eq!(hierarchy.parent_name("INBOX"), "INBOX");

    let work = tree.get("Work").unwrap();
    assert_eq!(work.record.attribute_names().collect::<Vec<_>>(), ["HasChildren"]);
    let projects = work.children.get("Projects").unwrap();
    assert_eq!(projects.record.full_name, "Work/Projects");
    assert_eq!(projects.record.depth, 1);
}

#[test]
fn every_attached_record_is_in_its_parents_list_once() {
    let lines = [
        r#"() "." "Lists.Rust.Announce""#,
        r#"() "." "Lists""#,
        r#"() "." "Lists.Rust""#,
        r#"() "." "Lists.Python""#,
        r#"() "." "INBOX""#,
        r#"() "." "Lists.Rust.Users""#,
    ];
    let hierarchy = FolderHierarchy::build(lines).unwrap();

    for record in hierarchy.records() {
        assert!(hierarchy.children_index().contains_key(&record.full_name));
        if let Some(parent) = &record.parent_name {
            let siblings = hierarchy.children(parent);
            let count = siblings.iter().filter(|c| **c == record.full_name).count();
            assert_eq!(count, 1, "{} should appear once under {parent}", record.full_name);
        }
    }

    assert_eq!(hierarchy.children("Lists"), ["Lists.Rust", "Lists.Python"]);
    assert_eq!(
        hierarchy.children("Lists.Rust"),
        ["Lists.Rust.Announce", "Lists.Rust.Users"]
    );
}

#[test]
fn orphan_is_listed_but_not_in_tree() {
    let hierarchy = FolderHierarchy::build([
        r#"(\HasNoChildren) "/" "INBOX""#,
        r#"(\HasNoChildren) "/" "Shared/Team""#,
    ])
    .unwrap();

    assert_eq!(
        hierarchy.names().collect::<Vec<_>>(),
        ["INBOX", "Shared/Team"]
    );
    assert_eq!(hierarchy.orphans(), ["Shared/Team"]);
    assert!(hierarchy.tree().get("Shared").is_none());
    assert!(hierarchy.children("Shared").is_empty());
}

#[test]
fn unicode_folder_names() {
    let hierarchy = FolderHierarchy::build([
        r#"(\HasChildren) "/" "&BBIERQQ+BDQETwRJBDgENQ-""#,
        r#"(\HasNoChildren) "/" "&BBIERQQ+BDQETwRJBDgENQ-/&BB4EQgRHBFEEQgRL-""#,
    ])
    .unwrap();

    assert_eq!(hierarchy.children("Входящие"), ["Входящие/Отчёты"]);
    let record = hierarchy.record("Входящие/Отчёты").unwrap();
    assert_eq!(record.name, "Отчёты");
    assert_eq!(hierarchy.find("Отч*"), ["Входящие/Отчёты"]);
}

#[test]
fn literal_listings_mix_with_lines() {
    let hierarchy = FolderHierarchy::build(vec![
        RawListing::from(r#"(\HasChildren) "/" "Work""#),
        RawListing::literal(r#"(\HasNoChildren) "/" {11}"#, "Work/Report"),
    ])
    .unwrap();

    assert_eq!(hierarchy.children("Work"), ["Work/Report"]);
}

#[test]
fn special_use_attributes() {
    let hierarchy = FolderHierarchy::build([
        r#"(\HasNoChildren \Sent) "/" "Sent Items""#,
        r#"(\HasNoChildren \Trash) "/" "Deleted Items""#,
        r#"(\Noselect \HasChildren) "/" "[Gmail]""#,
    ])
    .unwrap();

    let sent = hierarchy.record("Sent Items").unwrap();
    assert!(sent.has_attribute(&MailboxAttribute::Sent));
    assert!(!hierarchy.record("[Gmail]").unwrap().is_selectable());
}

#[test]
fn invalid_line_aborts_build() {
    let err = FolderHierarchy::build([
        r#"(\HasNoChildren) "/" "INBOX""#,
        r#"(\HasNoChildren) "/""#,
    ])
    .unwrap_err();

    assert!(matches!(err, Error::FolderParsing { .. }));
    assert!(err.to_string().contains(r#"(\\HasNoChildren) \"/\""#));
}

#[test]
fn from_server_responses() {
    let wire: [&[u8]; 3] = [
        b"* LIST (\\HasChildren) \"/\" Work\r\n",
        b"* LIST (\\HasNoChildren) \"/\" {14}\r\nWork/Q&-A 2024\r\n",
        b"* LIST (\\HasNoChildren) \"/\" \"INBOX\"\r\n",
    ];

    let listings: Vec<RawListing> = wire
        .iter()
        .map(|line| match ResponseParser::parse(line).unwrap() {
            Response::Untagged(UntaggedResponse::List(raw)) => raw,
            other => panic!("unexpected {other:?}"),
        })
        .collect();

    let hierarchy = FolderHierarchy::build(listings).unwrap();
    assert_eq!(
        hierarchy.names().collect::<Vec<_>>(),
        ["Work", "Work/Q&A 2024", "INBOX"]
    );
    assert_eq!(hierarchy.children("Work"), ["Work/Q&A 2024"]);
}
