//! Session configuration types.

/// LIST reference used when none is configured.
pub const DEFAULT_LIST_REFERENCE: &str = "";

/// LIST pattern used when none is configured.
pub const DEFAULT_LIST_PATTERN: &str = "*";

/// Folder session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Reference name passed to LIST.
    pub list_reference: String,
    /// Mailbox pattern passed to LIST.
    pub list_pattern: String,
    /// Issue `UID SEARCH` instead of `SEARCH`.
    pub uid_search: bool,
    /// Open folders with EXAMINE instead of SELECT.
    pub read_only: bool,
    /// Re-read the folder listing after CREATE, RENAME and DELETE.
    pub refresh_after_changes: bool,
}

impl SessionConfig {
    /// Creates the default configuration: every folder, UID search, read-write.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list_reference: DEFAULT_LIST_REFERENCE.to_string(),
            list_pattern: DEFAULT_LIST_PATTERN.to_string(),
            uid_search: true,
            read_only: false,
            refresh_after_changes: true,
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Creates a builder holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SessionConfig::new(),
        }
    }

    /// Sets the LIST reference name.
    #[must_use]
    pub fn list_reference(mut self, reference: impl Into<String>) -> Self {
        self.config.list_reference = reference.into();
        self
    }

    /// Sets the LIST mailbox pattern.
    #[must_use]
    pub fn list_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.list_pattern = pattern.into();
        self
    }

    /// Chooses between `UID SEARCH` and `SEARCH`.
    #[must_use]
    pub const fn uid_search(mut self, uid: bool) -> Self {
        self.config.uid_search = uid;
        self
    }

    /// Opens folders read-only with EXAMINE.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Sets whether the listing is re-read after folder changes.
    #[must_use]
    pub const fn refresh_after_changes(mut self, refresh: bool) -> Self {
        self.config.refresh_after_changes = refresh;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self::new()
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
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.list_reference, "");
        assert_eq!(config.list_pattern, "*");
        assert!(config.uid_search);
        assert!(!config.read_only);
        assert!(config.refresh_after_changes);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::builder()
            .list_reference("Archive")
            .list_pattern("%")
            .uid_search(false)
            .read_only(true)
            .refresh_after_changes(false)
            .build();

        assert_eq!(config.list_reference, "Archive");
        assert_eq!(config.list_pattern, "%");
        assert!(!config.uid_search);
        assert!(config.read_only);
        assert!(!config.refresh_after_changes);
    }

    #[test]
    fn test_builder_default_matches_new() {
        assert_eq!(SessionConfigBuilder::default().build(), SessionConfig::new());
    }
}
