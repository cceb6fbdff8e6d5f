//! Core IMAP types.

#![allow(clippy::missing_const_for_fn)]

mod identifiers;
mod mailbox;
mod status;

pub use identifiers::{Tag, Uid};
pub use mailbox::{ListResponse, Mailbox, MailboxAttribute};
pub use status::{MailboxStatus, StatusAttribute};
