//! STATUS data items.

/// Attribute requested with the STATUS command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusAttribute {
    /// Number of messages in the mailbox.
    Messages,
    /// Number of messages with the `\Recent` flag.
    Recent,
    /// Next UID to be assigned.
    UidNext,
    /// UIDVALIDITY value.
    UidValidity,
    /// Number of messages without the `\Seen` flag.
    Unseen,
}

impl StatusAttribute {
    /// Every attribute, in the order they are requested.
    pub const ALL: [Self; 5] = [
        Self::Messages,
        Self::Recent,
        Self::UidNext,
        Self::UidValidity,
        Self::Unseen,
    ];

    /// Returns the attribute name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "MESSAGES",
            Self::Recent => "RECENT",
            Self::UidNext => "UIDNEXT",
            Self::UidValidity => "UIDVALIDITY",
            Self::Unseen => "UNSEEN",
        }
    }

    /// Looks up an attribute by name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str().eq_ignore_ascii_case(name))
    }
}

/// Counters reported by STATUS for one mailbox.
///
/// Items the server did not report stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MailboxStatus {
    /// Number of messages in the mailbox.
    pub messages: Option<u32>,
    /// Number of recent messages.
    pub recent: Option<u32>,
    /// Number of unseen messages.
    pub unseen: Option<u32>,
    /// Next UID to be assigned.
    pub uid_next: Option<u32>,
    /// UIDVALIDITY value.
    pub uid_validity: Option<u32>,
}

impl MailboxStatus {
    /// Records one reported item.
    pub fn set(&mut self, attribute: StatusAttribute, value: u32) {
        let slot = match attribute {
            StatusAttribute::Messages => &mut self.messages,
            StatusAttribute::Recent => &mut self.recent,
            StatusAttribute::UidNext => &mut self.uid_next,
            StatusAttribute::UidValidity => &mut self.uid_validity,
            StatusAttribute::Unseen => &mut self.unseen,
        };
        *slot = Some(value);
    }

    /// Returns the value reported for an item.
    #[must_use]
    pub const fn get(&self, attribute: StatusAttribute) -> Option<u32> {
        match attribute {
            StatusAttribute::Messages => self.messages,
            StatusAttribute::Recent => self.recent,
            StatusAttribute::UidNext => self.uid_next,
            StatusAttribute::UidValidity => self.uid_validity,
            StatusAttribute::Unseen => self.unseen,
        }
    }
}
