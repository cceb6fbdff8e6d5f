//! Folder session over a [`Transport`].
//!
//! A session keeps the current [`FolderHierarchy`] and the selected folder.
//! The hierarchy is rebuilt from a fresh LIST after every change and only
//! replaced once the whole listing parsed, so a failed refresh leaves the
//! previous hierarchy in place.

#![allow(clippy::missing_errors_doc)]

use mailkit_imap::{FolderHierarchy, Mailbox, MailboxStatus, QueryBuilder, Uid};
use tracing::{debug, warn};

use crate::{Error, Result, SessionConfig, Transport};

/// Folder navigation, management and search on one connection.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    config: SessionConfig,
    hierarchy: FolderHierarchy,
    selected: Option<String>,
}

impl<T: Transport> Session<T> {
    /// Opens a session with the default configuration and reads the folder
    /// listing.
    pub fn open(transport: T) -> Result<Self> {
        Self::with_config(transport, SessionConfig::default())
    }

    /// Opens a session with the given configuration and reads the folder
    /// listing.
    pub fn with_config(transport: T, config: SessionConfig) -> Result<Self> {
        let mut session = Self {
            transport,
            config,
            hierarchy: FolderHierarchy::default(),
            selected: None,
        };
        session.refresh_folders()?;
        Ok(session)
    }

    /// Re-reads the folder listing and rebuilds the hierarchy.
    ///
    /// On error the previous hierarchy is kept.
    pub fn refresh_folders(&mut self) -> Result<()> {
        let raw = self
            .transport
            .list(&self.config.list_reference, &self.config.list_pattern)?;
        self.hierarchy.refresh(raw)?;
        debug!(
            folders = self.hierarchy.len(),
            orphans = self.hierarchy.orphans().len(),
            "folder listing refreshed"
        );
        Ok(())
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current folder hierarchy.
    #[must_use]
    pub const fn hierarchy(&self) -> &FolderHierarchy {
        &self.hierarchy
    }

    /// Returns the hierarchy separator, if the server reported one.
    #[must_use]
    pub const fn separator(&self) -> Option<char> {
        self.hierarchy.separator()
    }

    /// Returns every folder full name in listing order.
    #[must_use]
    pub fn folders(&self) -> Vec<&str> {
        self.hierarchy.names().collect()
    }

    /// Returns the folders whose last path segment matches `pattern`
    /// (`*` matches any run of characters, `\*` a literal asterisk).
    #[must_use]
    pub fn find_folders(&self, pattern: &str) -> Vec<&str> {
        self.hierarchy.find(pattern)
    }

    /// Returns the selected folder's full name.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects a folder by full name, closing any previously selected folder.
    ///
    /// Uses EXAMINE when the session is configured read-only.
    pub fn select(&mut self, full_name: &str) -> Result<()> {
        if !self.hierarchy.contains(full_name) {
            return Err(Error::NonexistentFolder(full_name.to_string()));
        }

        self.unselect()?;
        self.transport
            .select(&Mailbox::new(full_name), self.config.read_only)?;
        self.selected = Some(full_name.to_string());
        debug!(folder = full_name, read_only = self.config.read_only, "folder selected");
        Ok(())
    }

    /// Closes the selected folder, returning to the top level.
    pub fn unselect(&mut self) -> Result<()> {
        if self.selected.is_some() {
            self.transport.close()?;
            self.selected = None;
        }
        Ok(())
    }

    /// Returns the full names of the selected folder's direct children.
    ///
    /// Empty when nothing is selected.
    #[must_use]
    pub fn children(&self) -> &[String] {
        match self.selected.as_deref() {
            Some(name) => self.hierarchy.children(name),
            None => &[],
        }
    }

    /// Selects the parent of the selected folder.
    ///
    /// A top-level folder stays selected.
    pub fn parent(&mut self) -> Result<()> {
        let Some(current) = self.selected.clone() else {
            return Err(Error::NoFolderSelected);
        };
        let parent = self.hierarchy.parent_name(&current);
        if parent == current {
            return Ok(());
        }
        self.select(parent)
    }

    /// Creates a folder under the selected one, or at the top level when
    /// nothing is selected. Returns the new folder's full name.
    pub fn create_folder(&mut self, name: &str) -> Result<String> {
        let full_name = self.create_unrefreshed(name)?;
        self.refresh_after_change()?;
        Ok(full_name)
    }

    /// Creates several folders under the selected one, refreshing once at the
    /// end.
    ///
    /// Stops at the first failure. Folders created before it are still picked
    /// up by a refresh, and the failure is returned.
    pub fn create_folders<'a, I>(&mut self, names: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut created = Vec::new();
        for name in names {
            match self.create_unrefreshed(name) {
                Ok(full_name) => created.push(full_name),
                Err(err) => {
                    if !created.is_empty()
                        && let Err(refresh) = self.refresh_after_change()
                    {
                        warn!(error = %refresh, "refresh after partial create failed");
                    }
                    return Err(err);
                }
            }
        }
        self.refresh_after_change()?;
        Ok(created)
    }

    fn create_unrefreshed(&mut self, name: &str) -> Result<String> {
        self.check_segment(name)?;

        let full_name = match (self.selected.as_deref(), self.separator()) {
            (Some(parent), Some(separator)) => format!("{parent}{separator}{name}"),
            (Some(parent), None) => format!("{parent}{name}"),
            (None, _) => name.to_string(),
        };

        self.transport.create(&Mailbox::new(full_name.as_str()))?;
        debug!(folder = %full_name, "folder created");
        Ok(full_name)
    }

    /// Renames the selected folder and re-selects it under its new name.
    ///
    /// A plain name keeps the folder under its current parent; a name that
    /// contains the separator is taken as a full path. The folder is closed
    /// before the RENAME since some servers refuse to rename the open folder.
    pub fn rename_selected(&mut self, new_name: &str) -> Result<String> {
        let Some(current) = self.selected.clone() else {
            return Err(Error::NoFolderSelected);
        };

        let full_name = match self.separator() {
            Some(separator) if !new_name.contains(separator) => {
                match current.rsplit_once(separator) {
                    Some((parent, _)) => format!("{parent}{separator}{new_name}"),
                    None => new_name.to_string(),
                }
            }
            _ => new_name.to_string(),
        };

        self.unselect()?;
        self.transport
            .rename(&Mailbox::new(current.as_str()), &Mailbox::new(full_name.as_str()))?;
        debug!(from = %current, to = %full_name, "folder renamed");

        self.refresh_folders()?;
        self.select(&full_name)?;
        Ok(full_name)
    }

    /// Deletes a folder by full name, closing it first if it is selected.
    pub fn delete(&mut self, full_name: &str) -> Result<()> {
        if !self.hierarchy.contains(full_name) {
            return Err(Error::NonexistentFolder(full_name.to_string()));
        }
        if self.selected.as_deref() == Some(full_name) {
            self.unselect()?;
        }

        self.transport.delete(&Mailbox::new(full_name))?;
        debug!(folder = full_name, "folder deleted");
        self.refresh_after_change()
    }

    /// Deletes the selected folder.
    pub fn delete_selected(&mut self) -> Result<()> {
        let Some(current) = self.selected.clone() else {
            return Err(Error::NoFolderSelected);
        };
        self.delete(&current)
    }

    /// Finalizes `query` and searches the selected folder.
    ///
    /// Returns UIDs unless the session is configured for sequence numbers.
    pub fn search(&mut self, query: &QueryBuilder) -> Result<Vec<Uid>> {
        let Some(folder) = self.selected.as_deref() else {
            return Err(Error::NoFolderSelected);
        };

        let query = query.query()?;
        debug!(folder, %query, charset = ?query.charset(), "searching");
        let found = self.transport.search(&query, self.config.uid_search)?;
        debug!(folder, matches = found.len(), "search finished");
        Ok(found)
    }

    /// Reports the selected folder's message counters and UID state.
    pub fn info(&mut self) -> Result<MailboxStatus> {
        let Some(folder) = self.selected.as_deref() else {
            return Err(Error::NoFolderSelected);
        };

        let status = self.transport.status(&Mailbox::new(folder))?;
        debug!(
            folder,
            messages = ?status.messages,
            unseen = ?status.unseen,
            "folder status"
        );
        Ok(status)
    }

    /// Gets a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Gets a mutable reference to the transport.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the session and returns the transport.
    #[must_use]
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn check_segment(&self, name: &str) -> Result<()> {
        match self.separator() {
            Some(separator) if name.contains(separator) => Err(Error::InvalidFolderName {
                name: name.to_string(),
                separator,
            }),
            _ => Ok(()),
        }
    }

    fn refresh_after_change(&mut self) -> Result<()> {
        if self.config.refresh_after_changes {
            self.refresh_folders()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use mailkit_imap::{RawListing, SearchQuery};

    use super::*;

    /// Serves a fixed listing and accepts every command.
    struct Static(Vec<&'static str>);

    impl Transport for Static {
        fn list(&mut self, _: &str, _: &str) -> Result<Vec<RawListing>> {
            Ok(self.0.iter().copied().map(RawListing::from).collect())
        }

        fn select(&mut self, _: &Mailbox, _: bool) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn create(&mut self, _: &Mailbox) -> Result<()> {
            Ok(())
        }

        fn rename(&mut self, _: &Mailbox, _: &Mailbox) -> Result<()> {
            Ok(())
        }

        fn delete(&mut self, _: &Mailbox) -> Result<()> {
            Ok(())
        }

        fn status(&mut self, _: &Mailbox) -> Result<MailboxStatus> {
            Ok(MailboxStatus {
                messages: Some(2),
                ..MailboxStatus::default()
            })
        }

        fn search(&mut self, _: &SearchQuery, _: bool) -> Result<Vec<Uid>> {
            Ok(Vec::new())
        }
    }

    fn session() -> Session<Static> {
        Session::open(Static(vec![
            r#"(\HasChildren) "." "INBOX""#,
            r#"(\HasNoChildren) "." "INBOX.Receipts""#,
        ]))
        .unwrap()
    }

    #[test]
    fn test_open_reads_listing() {
        let session = session();
        assert_eq!(session.folders(), ["INBOX", "INBOX.Receipts"]);
        assert_eq!(session.separator(), Some('.'));
        assert!(session.selected().is_none());
        assert!(session.children().is_empty());
    }

    #[test]
    fn test_parent_of_top_level_is_noop() {
        let mut session = session();
        session.select("INBOX").unwrap();
        session.parent().unwrap();
        assert_eq!(session.selected(), Some("INBOX"));
    }

    #[test]
    fn test_parent_without_selection() {
        assert!(matches!(session().parent(), Err(Error::NoFolderSelected)));
    }

    #[test]
    fn test_info_needs_selection() {
        let mut session = session();
        assert!(matches!(session.info(), Err(Error::NoFolderSelected)));

        session.select("INBOX.Receipts").unwrap();
        assert_eq!(session.info().unwrap().messages, Some(2));
    }

    #[test]
    fn test_check_segment() {
        let session = session();
        assert!(session.check_segment("Taxes").is_ok());
        assert!(matches!(
            session.check_segment("Taxes.2024"),
            Err(Error::InvalidFolderName { separator: '.', .. })
        ));
    }
}
