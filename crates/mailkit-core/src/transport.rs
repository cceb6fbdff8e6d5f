//! The blocking command primitives a [`Session`](crate::Session) drives.
//!
//! Connection setup, TLS and authentication happen before a transport is
//! handed to a session. Mailbox arguments are Unicode; implementations encode
//! them with [`Mailbox::encoded`] before they go on the wire.

#![allow(clippy::missing_errors_doc)]

use mailkit_imap::{Mailbox, MailboxStatus, RawListing, SearchQuery, Uid};

use crate::Result;

/// Authenticated IMAP connection able to run the folder and search commands.
///
/// Every call blocks until the server completes the command. A `NO` or `BAD`
/// completion is an error; implementations do not retry.
pub trait Transport {
    /// Runs `LIST reference pattern` and returns each listing as received.
    fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<RawListing>>;

    /// Opens a mailbox with SELECT, or EXAMINE when `read_only` is set.
    fn select(&mut self, mailbox: &Mailbox, read_only: bool) -> Result<()>;

    /// Closes the currently open mailbox.
    fn close(&mut self) -> Result<()>;

    /// Creates a mailbox.
    fn create(&mut self, mailbox: &Mailbox) -> Result<()>;

    /// Renames a mailbox.
    fn rename(&mut self, from: &Mailbox, to: &Mailbox) -> Result<()>;

    /// Deletes a mailbox.
    fn delete(&mut self, mailbox: &Mailbox) -> Result<()>;

    /// Runs STATUS for MESSAGES, RECENT, UIDNEXT, UIDVALIDITY and UNSEEN.
    fn status(&mut self, mailbox: &Mailbox) -> Result<MailboxStatus>;

    /// Searches the open mailbox, returning UIDs (or sequence numbers when
    /// `uid` is false).
    fn search(&mut self, query: &SearchQuery, uid: bool) -> Result<Vec<Uid>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<RawListing>> {
        (**self).list(reference, pattern)
    }

    fn select(&mut self, mailbox: &Mailbox, read_only: bool) -> Result<()> {
        (**self).select(mailbox, read_only)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn create(&mut self, mailbox: &Mailbox) -> Result<()> {
        (**self).create(mailbox)
    }

    fn rename(&mut self, from: &Mailbox, to: &Mailbox) -> Result<()> {
        (**self).rename(from, to)
    }

    fn delete(&mut self, mailbox: &Mailbox) -> Result<()> {
        (**self).delete(mailbox)
    }

    fn status(&mut self, mailbox: &Mailbox) -> Result<MailboxStatus> {
        (**self).status(mailbox)
    }

    fn search(&mut self, query: &SearchQuery, uid: bool) -> Result<Vec<Uid>> {
        (**self).search(query, uid)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<RawListing>> {
        (**self).list(reference, pattern)
    }

    fn select(&mut self, mailbox: &Mailbox, read_only: bool) -> Result<()> {
        (**self).select(mailbox, read_only)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn create(&mut self, mailbox: &Mailbox) -> Result<()> {
        (**self).create(mailbox)
    }

    fn rename(&mut self, from: &Mailbox, to: &Mailbox) -> Result<()> {
        (**self).rename(from, to)
    }

    fn delete(&mut self, mailbox: &Mailbox) -> Result<()> {
        (**self).delete(mailbox)
    }

    fn status(&mut self, mailbox: &Mailbox) -> Result<MailboxStatus> {
        (**self).status(mailbox)
    }

    fn search(&mut self, query: &SearchQuery, uid: bool) -> Result<Vec<Uid>> {
        (**self).search(query, uid)
    }
}
