//! Lab Router configuration management
//!
//! Every value here has a built-in default matching the LaB deployment, so
//! a config file is optional. Loaded configuration is read-only: it is
//! validated once and then shared by reference.

use crate::error::{Error, Result};
use crate::event::Kind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The LaB private relay
pub const LAB_RELAY: &str = "wss://relay.thelab.community";

/// Public relays events are mirrored to when sharing is allowed
pub const PUBLIC_RELAYS: [&str; 6] = [
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.nostr.band",
    "wss://relay.primal.net",
    "wss://nostr.wine",
    "wss://relay.snort.social",
];

/// Main Lab Router configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Relay addresses
    #[serde(default)]
    pub relays: RelaysConfig,

    /// Classification tables
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Dispatch settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// HTTP query API settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl RouterConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location (`<config_dir>/lab-router/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("lab-router").join("config.toml"))
    }

    /// Check every section, normalizing the public relay list in place
    pub fn validate(&mut self) -> Result<()> {
        self.relays.validate()?;
        self.publish.validate()
    }
}

/// Relay addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaysConfig {
    /// Operator-controlled relay that receives every publish
    pub private_relay: String,

    /// Ordered public relays, used only when public sharing is allowed
    pub public_relays: Vec<String>,
}

impl RelaysConfig {
    /// Check relay addresses and normalize the public relay list.
    ///
    /// Duplicate public relays are dropped keeping the first occurrence.
    pub fn validate(&mut self) -> Result<()> {
        let private = self.private_relay.trim().to_string();
        if private.is_empty() {
            return Err(Error::Config("private_relay must not be empty".to_string()));
        }
        check_relay_url(&private)?;

        if self.public_relays.is_empty() {
            return Err(Error::Config(
                "public_relays must list at least one relay".to_string(),
            ));
        }

        let mut deduped: Vec<String> = Vec::with_capacity(self.public_relays.len());
        for relay in &self.public_relays {
            let relay = relay.trim();
            check_relay_url(relay)?;
            if same_relay(relay, &private) {
                return Err(Error::Config(format!(
                    "private relay {} must not appear in public_relays",
                    private
                )));
            }
            if !deduped.iter().any(|r| same_relay(r, relay)) {
                deduped.push(relay.to_string());
            }
        }

        self.private_relay = private;
        self.public_relays = deduped;
        Ok(())
    }
}

impl Default for RelaysConfig {
    fn default() -> Self {
        Self {
            private_relay: LAB_RELAY.to_string(),
            public_relays: PUBLIC_RELAYS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Kind and tag tables driving classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Kinds that must never reach public relays
    pub never_shareable_kinds: Vec<Kind>,

    /// Kinds that are personal or application data
    pub private_kinds: Vec<Kind>,

    /// Kinds that may be shared publicly on request
    pub shareable_kinds: Vec<Kind>,

    /// Tag name scoping an event to a private group
    pub group_tag: String,

    /// Topic tag name
    pub topic_tag: String,

    /// Topic values marking personal reflective content
    pub private_topics: Vec<String>,

    /// Addressable identifier tag name
    pub identifier_tag: String,

    /// Identifier prefixes marking personal reflective content
    pub private_identifier_prefixes: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            never_shareable_kinds: vec![
                Kind::GROUP_METADATA,
                Kind::GROUP_MESSAGE,
                Kind::GROUP_MESSAGE_REPLY,
                Kind::ENCRYPTED_DIRECT_MESSAGE,
                Kind::GIFT_WRAP,
            ],
            private_kinds: vec![Kind::APPLICATION_DATA, Kind::LONG_FORM_ARTICLE],
            shareable_kinds: vec![
                Kind::METADATA,
                Kind::TEXT_NOTE,
                Kind::CONTACT_LIST,
                Kind::REACTION,
                Kind::RELAY_LIST,
            ],
            group_tag: "h".to_string(),
            topic_tag: "t".to_string(),
            private_topics: vec![
                "journal".to_string(),
                "lab-note".to_string(),
                "big-dreams".to_string(),
                "daily-practice".to_string(),
                "experiment-progress".to_string(),
            ],
            identifier_tag: "d".to_string(),
            private_identifier_prefixes: vec![
                "lab-".to_string(),
                "journal-".to_string(),
                "progress-".to_string(),
            ],
        }
    }
}

/// Dispatch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Per-relay send timeout in seconds
    pub timeout_secs: u64,

    /// Client identifier appended as a `client` tag in secure contexts
    pub client_tag: Option<String>,

    /// Whether the publisher runs in a secure context
    pub secure_context: bool,
}

impl PublishConfig {
    /// Reject a zero send timeout
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("publish.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Per-relay send timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            client_tag: Some("lab".to_string()),
            secure_context: true,
        }
    }
}

/// HTTP query API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18791,
            cors_origins: Vec::new(),
        }
    }
}

fn check_relay_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("wss://")
        .or_else(|| url.strip_prefix("ws://"))
        .ok_or_else(|| Error::Config(format!("relay address {} must use ws:// or wss://", url)))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(Error::Config(format!("relay address {} has no host", url)));
    }
    Ok(())
}

fn same_relay(a: &str, b: &str) -> bool {
    a.trim_end_matches('/').eq_ignore_ascii_case(b.trim_end_matches('/'))
}
