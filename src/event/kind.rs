//! Event kinds

use serde::{Deserialize, Serialize};

/// Numeric discriminator for an event's semantic type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(pub u16);

impl Kind {
    /// Profile metadata (NIP-01)
    pub const METADATA: Kind = Kind(0);
    /// Short text note (NIP-01)
    pub const TEXT_NOTE: Kind = Kind(1);
    /// Contact list (NIP-02)
    pub const CONTACT_LIST: Kind = Kind(3);
    /// Encrypted direct message (NIP-04)
    pub const ENCRYPTED_DIRECT_MESSAGE: Kind = Kind(4);
    /// Reaction (NIP-25)
    pub const REACTION: Kind = Kind(7);
    /// Group message (NIP-29)
    pub const GROUP_MESSAGE: Kind = Kind(11);
    /// Reply to a group message (NIP-29)
    pub const GROUP_MESSAGE_REPLY: Kind = Kind(12);
    /// Gift wrap (NIP-59)
    pub const GIFT_WRAP: Kind = Kind(1059);
    /// Relay list metadata (NIP-65)
    pub const RELAY_LIST: Kind = Kind(10002);
    /// Long-form article (NIP-23)
    pub const LONG_FORM_ARTICLE: Kind = Kind(30023);
    /// Arbitrary application data (NIP-78)
    pub const APPLICATION_DATA: Kind = Kind(30078);
    /// Group metadata (NIP-29)
    pub const GROUP_METADATA: Kind = Kind(39000);
}

impl From<u16> for Kind {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Kind::GROUP_MESSAGE).unwrap(), "11");
        let kind: Kind = serde_json::from_str("30078").unwrap();
        assert_eq!(kind, Kind::APPLICATION_DATA);
    }

    #[test]
    fn test_display_and_from() {
        assert_eq!(Kind::from(30023u16), Kind::LONG_FORM_ARTICLE);
        assert_eq!(Kind::GIFT_WRAP.to_string(), "1059");
    }
}
