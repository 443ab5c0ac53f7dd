//! Relay-set resolution
//!
//! The private relay is always the first destination. Public relays are
//! appended as one contiguous block only when the policy allows it.

use crate::config::{RelaysConfig, RouterConfig};
use crate::error::Result;
use crate::event::{Kind, Tags};
use crate::privacy::{PolicyDecision, PolicyEvaluation, SharingPolicy};

/// Ordered destination relays for one publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySet {
    relays: Vec<String>,
    includes_public: bool,
}

impl RelaySet {
    fn private_only(private_relay: &str) -> Self {
        Self {
            relays: vec![private_relay.to_string()],
            includes_public: false,
        }
    }

    fn with_public(private_relay: &str, public_relays: &[String]) -> Self {
        let mut relays = Vec::with_capacity(public_relays.len() + 1);
        relays.push(private_relay.to_string());
        relays.extend(public_relays.iter().cloned());
        Self {
            relays,
            includes_public: true,
        }
    }

    /// The private relay (always first)
    pub fn private_relay(&self) -> &str {
        &self.relays[0]
    }

    /// Public relays in configured order; empty for private-only routing
    pub fn public_relays(&self) -> &[String] {
        &self.relays[1..]
    }

    /// Whether public relays are included
    pub fn includes_public(&self) -> bool {
        self.includes_public
    }

    /// All relays, private first
    pub fn as_slice(&self) -> &[String] {
        &self.relays
    }

    /// Number of destination relays
    pub fn len(&self) -> usize {
        self.relays.len()
    }

    /// Always false: the private relay is always present
    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    /// Relays in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.relays.iter().map(String::as_str)
    }

    /// Consume into the ordered relay addresses
    pub fn into_vec(self) -> Vec<String> {
        self.relays
    }
}

/// Routing decision for a publish
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Destination relays
    pub relays: RelaySet,
    /// Policy evaluation that chose them
    pub evaluation: PolicyEvaluation,
}

impl RoutingDecision {
    /// Caller asked for public sharing but the classification forbade it
    pub fn vetoed(&self) -> bool {
        self.evaluation.decision == PolicyDecision::Vetoed
    }
}

/// Resolves destination relays from the sharing policy
#[derive(Debug, Clone)]
pub struct RelayResolver {
    relays: RelaysConfig,
    policy: SharingPolicy,
}

impl RelayResolver {
    /// Create a resolver, validating and de-duplicating the relay settings
    pub fn new(mut relays: RelaysConfig, policy: SharingPolicy) -> Result<Self> {
        relays.validate()?;
        Ok(Self { relays, policy })
    }

    /// Create a resolver from a configuration
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        Self::new(config.relays.clone(), SharingPolicy::new(config.policy.clone()))
    }

    /// The sharing policy in use
    pub fn policy(&self) -> &SharingPolicy {
        &self.policy
    }

    /// Relay settings in use
    pub fn relays(&self) -> &RelaysConfig {
        &self.relays
    }

    /// Destination relays for an event
    pub fn resolve_relays(&self, kind: Kind, tags: &Tags, wants_public: bool) -> RelaySet {
        if self.policy.should_publish_publicly(kind, tags, wants_public) {
            RelaySet::with_public(&self.relays.private_relay, &self.relays.public_relays)
        } else {
            RelaySet::private_only(&self.relays.private_relay)
        }
    }

    /// Destination relays together with the policy evaluation behind them
    pub fn route(&self, kind: Kind, tags: &Tags, wants_public: bool) -> RoutingDecision {
        let evaluation = self.policy.evaluate(kind, tags, wants_public);
        let relays = if evaluation.decision.allows_public() {
            RelaySet::with_public(&self.relays.private_relay, &self.relays.public_relays)
        } else {
            RelaySet::private_only(&self.relays.private_relay)
        };
        RoutingDecision { relays, evaluation }
    }
}

impl Default for RelayResolver {
    /// The built-in LaB relays, which are valid by construction
    fn default() -> Self {
        Self {
            relays: RelaysConfig::default(),
            policy: SharingPolicy::default(),
        }
    }
}
