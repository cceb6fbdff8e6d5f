//! Session behaviour against an in-memory server.

#![allow(clippy::unwrap_used)]

use mailkit_core::{
    Error, MailboxStatus, QueryBuilder, SearchQuery, Session, SessionConfig, Transport, Uid,
};
use mailkit_imap::{Mailbox, RawListing, utf7};

/// Keeps a folder list, applies changes to it and records every command.
#[derive(Default)]
struct MockServer {
    folders: Vec<String>,
    calls: Vec<String>,
    broken_listing: bool,
    /// Number of CREATEs accepted before the server reports a full quota.
    create_quota: Option<usize>,
    matches: Vec<u32>,
}

impl MockServer {
    fn with_folders(folders: &[&str]) -> Self {
        Self {
            folders: folders.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl Transport for MockServer {
    fn list(&mut self, reference: &str, pattern: &str) -> mailkit_core::Result<Vec<RawListing>> {
        self.calls.push(format!("LIST {reference:?} {pattern:?}"));
        let mut lines: Vec<RawListing> = self
            .folders
            .iter()
            .map(|name| {
                let encoded = String::from_utf8(utf7::encode(name)).unwrap();
                RawListing::from(format!(r#"(\HasNoChildren) "/" "{encoded}""#))
            })
            .collect();
        if self.broken_listing {
            lines.push(RawListing::from(r#"(\HasNoChildren) "/""#));
        }
        Ok(lines)
    }

    fn select(&mut self, mailbox: &Mailbox, read_only: bool) -> mailkit_core::Result<()> {
        let verb = if read_only { "EXAMINE" } else { "SELECT" };
        self.calls.push(format!("{verb} {mailbox}"));
        Ok(())
    }

    fn close(&mut self) -> mailkit_core::Result<()> {
        self.calls.push("CLOSE".to_string());
        Ok(())
    }

    fn create(&mut self, mailbox: &Mailbox) -> mailkit_core::Result<()> {
        if self.create_quota == Some(self.count("CREATE")) {
            return Err(Error::transport("quota exceeded"));
        }
        self.calls.push(format!("CREATE {}", mailbox.encoded()));
        self.folders.push(mailbox.as_str().to_string());
        Ok(())
    }

    fn rename(&mut self, from: &Mailbox, to: &Mailbox) -> mailkit_core::Result<()> {
        self.calls.push(format!("RENAME {from} {to}"));
        for folder in &mut self.folders {
            if folder == from.as_str() {
                *folder = to.as_str().to_string();
            }
        }
        Ok(())
    }

    fn delete(&mut self, mailbox: &Mailbox) -> mailkit_core::Result<()> {
        self.calls.push(format!("DELETE {mailbox}"));
        self.folders.retain(|f| f != mailbox.as_str());
        Ok(())
    }

    fn status(&mut self, mailbox: &Mailbox) -> mailkit_core::Result<MailboxStatus> {
        self.calls.push(format!("STATUS {mailbox}"));
        Ok(MailboxStatus {
            messages: u32::try_from(self.matches.len()).ok(),
            unseen: Some(0),
            ..MailboxStatus::default()
        })
    }

    fn search(&mut self, query: &SearchQuery, uid: bool) -> mailkit_core::Result<Vec<Uid>> {
        let verb = if uid { "UID SEARCH" } else { "SEARCH" };
        self.calls.push(format!("{verb} {query}"));
        Ok(self.matches.iter().filter_map(|&n| Uid::new(n)).collect())
    }
}

fn server() -> MockServer {
    MockServer::with_folders(&["INBOX", "Work", "Work/Drafts", "Work/Clients"])
}

#[test]
fn open_lists_every_folder() {
    let session = Session::open(server()).unwrap();

    assert_eq!(session.folders(), ["INBOX", "Work", "Work/Drafts", "Work/Clients"]);
    assert_eq!(session.separator(), Some('/'));
    assert_eq!(session.find_folders("*Dr*"), ["Work/Drafts"]);
    assert_eq!(session.transport().calls, [r#"LIST "" "*""#]);
}

#[test]
fn list_scope_comes_from_config() {
    let config = SessionConfig::builder()
        .list_reference("Work")
        .list_pattern("%")
        .build();
    let session = Session::with_config(server(), config).unwrap();
    assert_eq!(session.transport().calls, [r#"LIST "Work" "%""#]);
}

#[test]
fn navigation_follows_the_hierarchy() {
    let mut session = Session::open(server()).unwrap();

    session.select("Work").unwrap();
    assert_eq!(session.children(), ["Work/Drafts", "Work/Clients"]);

    session.select("Work/Drafts").unwrap();
    assert!(session.children().is_empty());

    session.parent().unwrap();
    assert_eq!(session.selected(), Some("Work"));

    session.unselect().unwrap();
    assert!(session.selected().is_none());
    assert!(session.children().is_empty());

    assert_eq!(
        session.transport().calls[1..],
        [
            "SELECT Work",
            "CLOSE",
            "SELECT Work/Drafts",
            "CLOSE",
            "SELECT Work",
            "CLOSE",
        ]
    );
}

#[test]
fn unknown_folder_is_rejected_locally() {
    let mut session = Session::open(server()).unwrap();

    let err = session.select("Personal").unwrap_err();
    assert!(matches!(err, Error::NonexistentFolder(ref name) if name == "Personal"));
    assert_eq!(session.transport().count("SELECT"), 0);
}

#[test]
fn read_only_sessions_examine() {
    let config = SessionConfig::builder().read_only(true).build();
    let mut session = Session::with_config(server(), config).unwrap();

    session.select("INBOX").unwrap();
    assert_eq!(session.transport().calls.last().unwrap(), "EXAMINE INBOX");
}

#[test]
fn create_folder_nests_under_selection() {
    let mut session = Session::open(server()).unwrap();
    session.select("Work").unwrap();

    let created = session.create_folder("Отчёты").unwrap();

    assert_eq!(created, "Work/Отчёты");
    assert!(
        session
            .transport()
            .calls
            .contains(&"CREATE Work/&BB4EQgRHBFEEQgRL-".to_string())
    );
    assert_eq!(
        session.hierarchy().children("Work"),
        ["Work/Drafts", "Work/Clients", "Work/Отчёты"]
    );
}

#[test]
fn create_folder_at_top_level() {
    let mut session = Session::open(server()).unwrap();
    assert_eq!(session.create_folder("Archive").unwrap(), "Archive");
    assert!(session.folders().contains(&"Archive"));
}

#[test]
fn create_folder_rejects_separator() {
    let mut session = Session::open(server()).unwrap();

    let err = session.create_folder("Taxes/2024").unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidFolderName { ref name, separator: '/' } if name == "Taxes/2024"
    ));
    assert_eq!(session.transport().count("CREATE"), 0);
}

#[test]
fn create_folders_refreshes_once() {
    let mut session = Session::open(server()).unwrap();
    session.select("Work").unwrap();

    let created = session.create_folders(["2023", "2024"]).unwrap();

    assert_eq!(created, ["Work/2023", "Work/2024"]);
    assert_eq!(session.transport().count("LIST"), 2);
    assert_eq!(session.hierarchy().children("Work").len(), 4);
}

#[test]
fn create_folders_refreshes_after_partial_failure() {
    let mut server = server();
    server.create_quota = Some(1);
    let mut session = Session::open(server).unwrap();
    session.select("Work").unwrap();

    let err = session.create_folders(["2023", "2024"]).unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(session.transport().count("LIST"), 2);
    assert!(session.folders().contains(&"Work/2023"));
    assert!(!session.folders().contains(&"Work/2024"));
}

#[test]
fn create_folders_first_failure_skips_refresh() {
    let mut server = server();
    server.create_quota = Some(0);
    let mut session = Session::open(server).unwrap();

    assert!(session.create_folders(["2023"]).is_err());
    assert_eq!(session.transport().count("LIST"), 1);
}

#[test]
fn no_refresh_when_disabled() {
    let config = SessionConfig::builder().refresh_after_changes(false).build();
    let mut session = Session::with_config(server(), config).unwrap();

    session.create_folder("Later").unwrap();
    assert_eq!(session.transport().count("LIST"), 1);
    assert!(!session.folders().contains(&"Later"));

    session.refresh_folders().unwrap();
    assert!(session.folders().contains(&"Later"));
}

#[test]
fn rename_keeps_parent_path() {
    let mut session = Session::open(server()).unwrap();
    session.select("Work/Drafts").unwrap();

    let renamed = session.rename_selected("Entwürfe").unwrap();

    assert_eq!(renamed, "Work/Entwürfe");
    assert_eq!(session.selected(), Some("Work/Entwürfe"));
    assert_eq!(
        session.transport().calls[2..],
        [
            "CLOSE",
            "RENAME Work/Drafts Work/Entwürfe",
            r#"LIST "" "*""#,
            "SELECT Work/Entwürfe",
        ]
    );
    assert_eq!(
        session.hierarchy().children("Work"),
        ["Work/Entwürfe", "Work/Clients"]
    );
}

#[test]
fn rename_to_full_path_moves_folder() {
    let mut session = Session::open(server()).unwrap();
    session.select("Work/Clients").unwrap();

    assert_eq!(session.rename_selected("INBOX/Clients").unwrap(), "INBOX/Clients");
    assert_eq!(session.hierarchy().children("INBOX"), ["INBOX/Clients"]);
}

#[test]
fn rename_needs_selection() {
    let mut session = Session::open(server()).unwrap();
    assert!(matches!(
        session.rename_selected("Other"),
        Err(Error::NoFolderSelected)
    ));
}

#[test]
fn delete_selected_folder() {
    let mut session = Session::open(server()).unwrap();
    session.select("Work/Clients").unwrap();

    session.delete_selected().unwrap();

    assert!(session.selected().is_none());
    assert_eq!(session.folders(), ["INBOX", "Work", "Work/Drafts"]);
    assert!(matches!(
        session.delete("Work/Clients"),
        Err(Error::NonexistentFolder(_))
    ));
}

#[test]
fn search_uses_selected_folder() {
    let mut server = server();
    server.matches = vec![3, 7];
    let mut session = Session::open(server).unwrap();

    let query = QueryBuilder::new().subject("Café").unseen();
    assert!(matches!(session.search(&query), Err(Error::NoFolderSelected)));

    session.select("INBOX").unwrap();
    let found = session.search(&query).unwrap();

    assert_eq!(found.iter().map(|u| u.get()).collect::<Vec<_>>(), [3, 7]);
    assert_eq!(
        session.transport().calls.last().unwrap(),
        "UID SEARCH CHARSET UTF-8 SUBJECT Café UNSEEN"
    );
}

#[test]
fn info_reports_selected_folder() {
    let mut server = server();
    server.matches = vec![1, 2, 3];
    let mut session = Session::open(server).unwrap();

    assert!(matches!(session.info(), Err(Error::NoFolderSelected)));

    session.select("Work/Drafts").unwrap();
    let info = session.info().unwrap();

    assert_eq!(info.messages, Some(3));
    assert_eq!(info.unseen, Some(0));
    assert_eq!(info.uid_validity, None);
    assert_eq!(session.transport().calls.last().unwrap(), "STATUS Work/Drafts");
}

#[test]
fn search_with_sequence_numbers() {
    let config = SessionConfig::builder().uid_search(false).build();
    let mut session = Session::with_config(server(), config).unwrap();
    session.select("INBOX").unwrap();

    session.search(&QueryBuilder::new()).unwrap();
    assert_eq!(session.transport().calls.last().unwrap(), "SEARCH ");
}

#[test]
fn unsupported_search_never_reaches_server() {
    let mut session = Session::open(server()).unwrap();
    session.select("INBOX").unwrap();

    let query = QueryBuilder::new().subject("Привет").body("テスト");
    let err = session.search(&query).unwrap_err();

    assert!(matches!(
        err,
        Error::Imap(mailkit_imap::Error::SearchSyntaxNotSupported { .. })
    ));
    assert_eq!(session.transport().count("UID SEARCH"), 0);
}

#[test]
fn failed_refresh_keeps_previous_hierarchy() {
    let mut session = Session::open(server()).unwrap();
    let before = session.hierarchy().clone();

    session.transport_mut().folders.push("Personal".to_string());
    session.transport_mut().broken_listing = true;

    let err = session.refresh_folders().unwrap_err();
    assert!(matches!(
        err,
        Error::Imap(mailkit_imap::Error::FolderParsing { .. })
    ));
    assert_eq!(session.hierarchy(), &before);
    assert!(!session.folders().contains(&"Personal"));
}

#[test]
fn transport_failures_propagate() {
    let mut server = server();
    server.create_quota = Some(0);
    let mut session = Session::open(server).unwrap();

    let err = session.create_folder("Archive").unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.to_string(), "Transport error: quota exceeded");
}

#[test]
fn borrowed_transport_stays_with_caller() {
    let mut server = server();
    {
        let mut session = Session::open(&mut server).unwrap();
        session.select("INBOX").unwrap();
    }
    assert_eq!(server.calls.last().unwrap(), "SELECT INBOX");
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn created_folder_becomes_child_of_selection(name in "[A-Za-z0-9À-ÿ ]{1,12}") {
            let mut session = Session::open(server()).unwrap();
            session.select("Work").unwrap();

            let full_name = session.create_folder(&name).unwrap();

            prop_assert_eq!(&full_name, &format!("Work/{name}"));
            prop_assert!(session.hierarchy().children("Work").contains(&full_name));
        }

        #[test]
        fn separator_in_name_never_reaches_server(head in "[a-z]{0,5}", tail in "[a-z]{0,5}") {
            let mut session = Session::open(server()).unwrap();

            let name = format!("{head}/{tail}");
            let rejected = matches!(
                session.create_folder(&name),
                Err(Error::InvalidFolderName { .. })
            );
            prop_assert!(rejected);
            prop_assert_eq!(session.transport().count("CREATE"), 0);
        }
    }
}
