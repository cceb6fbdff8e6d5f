//! Wire transport against scripted server output.

#![allow(clippy::unwrap_used)]

use std::io::{self, BufRead, Cursor, Read, Write};

use mailkit_core::{
    Error, FolderHierarchy, LiteralMode, QueryBuilder, Session, Transport, WireTransport,
};
use mailkit_imap::Mailbox;

/// Replays canned server output and captures what the client sends.
struct Script {
    server: Cursor<Vec<u8>>,
    client: Vec<u8>,
}

impl Script {
    fn new(server: &[u8]) -> Self {
        Self {
            server: Cursor::new(server.to_vec()),
            client: Vec::new(),
        }
    }

    fn sent(&self) -> String {
        String::from_utf8(self.client.clone()).unwrap()
    }
}

impl Read for Script {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.server.read(buf)
    }
}

impl BufRead for Script {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.server.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.server.consume(amt);
    }
}

impl Write for Script {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.client.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn list_collects_lines_and_literals() {
    let mut transport = WireTransport::new(Script::new(
        b"* LIST (\\HasChildren) \"/\" Work\r\n\
          * LIST (\\HasNoChildren) \"/\" {14}\r\nWork/Q&-A 2024\r\n\
          * LIST (\\HasNoChildren) \"/\" \"&BBIERQQ+BDQETwRJBDgENQ-\"\r\n\
          A0001 OK LIST completed\r\n",
    ));

    let listings = transport.list("", "*").unwrap();
    assert_eq!(transport.get_ref().sent(), "A0001 LIST \"\" \"*\"\r\n");

    let hierarchy = FolderHierarchy::build(listings).unwrap();
    assert_eq!(
        hierarchy.names().collect::<Vec<_>>(),
        ["Work", "Work/Q&A 2024", "Входящие"]
    );
}

#[test]
fn select_encodes_mailbox_and_skips_status_data() {
    let mut transport = WireTransport::new(Script::new(
        b"* FLAGS (\\Answered \\Seen)\r\n\
          * 23 EXISTS\r\n\
          * OK [UIDVALIDITY 3857529045] UIDs valid\r\n\
          A0001 OK [READ-WRITE] SELECT completed\r\n\
          A0002 OK EXAMINE completed\r\n",
    ));

    transport.select(&Mailbox::new("Входящие"), false).unwrap();
    transport.select(&Mailbox::new("Q&A"), true).unwrap();

    assert_eq!(
        transport.get_ref().sent(),
        "A0001 SELECT &BBIERQQ+BDQETwRJBDgENQ-\r\nA0002 EXAMINE Q&-A\r\n"
    );
}

#[test]
fn no_and_bad_become_errors() {
    let mut transport = WireTransport::new(Script::new(
        b"A0001 NO [ALREADYEXISTS] Mailbox exists\r\n\
          A0002 BAD Command syntax error\r\n",
    ));

    let err = transport.create(&Mailbox::new("Work")).unwrap_err();
    assert!(matches!(
        err,
        Error::Imap(mailkit_imap::Error::No(ref text)) if text.contains("ALREADYEXISTS")
    ));

    let err = transport.delete(&Mailbox::new("Work")).unwrap_err();
    assert!(matches!(err, Error::Imap(mailkit_imap::Error::Bad(_))));
}

#[test]
fn search_sends_literal_and_merges_results() {
    let mut transport = WireTransport::with_tag_prefix(
        Script::new(b"* SEARCH 4 9\r\n* SEARCH 12\r\nm0001 OK SEARCH completed\r\n"),
        "m",
    )
    .with_literal_mode(LiteralMode::NonSynchronizing);

    let query = QueryBuilder::new().subject("Café").unseen().query().unwrap();
    let uids = transport.search(&query, true).unwrap();

    assert_eq!(uids.iter().map(|u| u.get()).collect::<Vec<_>>(), [4, 9, 12]);
    assert_eq!(
        transport.get_ref().sent(),
        "m0001 UID SEARCH CHARSET UTF-8 SUBJECT {5+}\r\nCafé UNSEEN\r\n"
    );
}

#[test]
fn search_waits_for_continuation_before_literal() {
    let mut transport = WireTransport::new(Script::new(
        b"+ Ready for literal\r\n* SEARCH 7\r\nA0001 OK SEARCH completed\r\n",
    ));
    assert_eq!(transport.literal_mode(), LiteralMode::Synchronizing);

    let query = QueryBuilder::new().subject("Café").query().unwrap();
    let uids = transport.search(&query, true).unwrap();

    assert_eq!(uids.iter().map(|u| u.get()).collect::<Vec<_>>(), [7]);
    assert_eq!(
        transport.get_ref().sent(),
        "A0001 UID SEARCH CHARSET UTF-8 SUBJECT {5}\r\nCafé\r\n"
    );
}

#[test]
fn rejected_literal_is_not_sent() {
    let mut transport = WireTransport::new(Script::new(
        b"A0001 NO [BADCHARSET (US-ASCII)] Charset not supported\r\n",
    ));

    let query = QueryBuilder::new().subject("Café").query().unwrap();
    let err = transport.search(&query, true).unwrap_err();

    assert!(matches!(
        err,
        Error::Imap(mailkit_imap::Error::No(ref text)) if text.contains("BADCHARSET")
    ));
    assert_eq!(
        transport.get_ref().sent(),
        "A0001 UID SEARCH CHARSET UTF-8 SUBJECT {5}\r\n"
    );
}

#[test]
fn early_ok_before_literal_is_protocol_error() {
    let mut transport = WireTransport::new(Script::new(b"A0001 OK SEARCH completed\r\n"));

    let query = QueryBuilder::new().subject("Café").query().unwrap();
    let err = transport.search(&query, true).unwrap_err();
    assert!(matches!(err, Error::Imap(mailkit_imap::Error::Protocol(_))));
}

#[test]
fn status_reads_counters_for_the_mailbox() {
    let mut transport = WireTransport::new(Script::new(
        b"* STATUS \"&BBIERQQ+BDQETwRJBDgENQ-\" (MESSAGES 52 RECENT 1 UIDNEXT 4827 UIDVALIDITY 1700000000 UNSEEN 3)\r\n\
          A0001 OK STATUS completed\r\n",
    ));

    let status = transport.status(&Mailbox::new("Входящие")).unwrap();
    assert_eq!(status.messages, Some(52));
    assert_eq!(status.recent, Some(1));
    assert_eq!(status.unseen, Some(3));
    assert_eq!(status.uid_next, Some(4827));
    assert_eq!(status.uid_validity, Some(1_700_000_000));

    assert_eq!(
        transport.get_ref().sent(),
        "A0001 STATUS &BBIERQQ+BDQETwRJBDgENQ- (MESSAGES RECENT UIDNEXT UIDVALIDITY UNSEEN)\r\n"
    );
}

#[test]
fn status_without_data_is_protocol_error() {
    let mut transport = WireTransport::new(Script::new(b"A0001 OK STATUS completed\r\n"));

    let err = transport.status(&Mailbox::inbox()).unwrap_err();
    assert!(matches!(err, Error::Imap(mailkit_imap::Error::Protocol(_))));
}

#[test]
fn rename_and_close() {
    let mut transport = WireTransport::new(Script::new(
        b"A0001 OK CLOSE completed\r\nA0002 OK RENAME completed\r\n",
    ));

    transport.close().unwrap();
    transport
        .rename(&Mailbox::new("Work/Drafts"), &Mailbox::new("Work/Entwürfe"))
        .unwrap();

    assert_eq!(
        transport.into_inner().sent(),
        "A0001 CLOSE\r\nA0002 RENAME Work/Drafts Work/Entw&APw-rfe\r\n"
    );
}

#[test]
fn bye_aborts_command() {
    let mut transport = WireTransport::new(Script::new(b"* BYE Autologout; idle too long\r\n"));

    let err = transport.close().unwrap_err();
    assert!(matches!(err, Error::Imap(mailkit_imap::Error::Protocol(_))));
}

#[test]
fn closed_connection_is_io_error() {
    let mut transport = WireTransport::new(Script::new(b"* LIST () \"/\" INBOX\r\n"));
    assert!(matches!(transport.list("", "*"), Err(Error::Io(_))));
}

#[test]
fn session_over_the_wire() {
    let script = Script::new(
        b"* LIST (\\HasNoChildren) \"/\" INBOX\r\n\
          * LIST (\\HasChildren) \"/\" Archive\r\n\
          * LIST (\\HasNoChildren) \"/\" Archive/2023\r\n\
          A0001 OK LIST completed\r\n\
          * 2 EXISTS\r\n\
          A0002 OK [READ-ONLY] EXAMINE completed\r\n\
          * SEARCH 1\r\n\
          A0003 OK SEARCH completed\r\n\
          * STATUS Archive (MESSAGES 2 UNSEEN 0)\r\n\
          A0004 OK STATUS completed\r\n",
    );
    let config = mailkit_core::SessionConfig::builder().read_only(true).build();
    let mut session = Session::with_config(WireTransport::new(script), config).unwrap();

    assert!(session.children().is_empty());
    session.select("Archive").unwrap();
    assert_eq!(session.children(), ["Archive/2023"]);

    let query = QueryBuilder::new().since("1-Jan-2023").unwrap();
    let uids = session.search(&query).unwrap();
    assert_eq!(uids.len(), 1);

    let info = session.info().unwrap();
    assert_eq!((info.messages, info.unseen, info.recent), (Some(2), Some(0), None));

    assert_eq!(
        session.into_transport().into_inner().sent(),
        "A0001 LIST \"\" \"*\"\r\n\
         A0002 EXAMINE Archive\r\n\
         A0003 UID SEARCH SINCE 1-Jan-2023\r\n\
         A0004 STATUS Archive (MESSAGES RECENT UIDNEXT UIDVALIDITY UNSEEN)\r\n"
    );
}
