//! Public sharing policy
//!
//! Caller intent is necessary but never sufficient: the classification can
//! only take public sharing away, never grant it.

use super::classifier::{ClassificationResult, Classifier, PrivacyClass};
use crate::config::PolicyConfig;
use crate::event::{Kind, Tags};
use serde::{Deserialize, Serialize};

/// Policy decision for a single publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDecision {
    /// Caller did not ask for public sharing
    PrivateOnly,
    /// Caller asked and the event is shareable
    Public,
    /// Caller asked but the classification forbids it
    Vetoed,
}

impl PolicyDecision {
    /// Whether public relays receive the event
    pub fn allows_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Evaluation of a publish request against the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEvaluation {
    pub decision: PolicyDecision,
    pub classification: ClassificationResult,
}

/// Sharing policy built on a [`Classifier`]
#[derive(Debug, Clone, Default)]
pub struct SharingPolicy {
    classifier: Classifier,
}

impl SharingPolicy {
    /// Create a policy over the given tables
    pub fn new(tables: PolicyConfig) -> Self {
        Self {
            classifier: Classifier::new(tables),
        }
    }

    /// The underlying classifier
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Whether the event is ever eligible for public relays
    pub fn can_publish_publicly(&self, kind: Kind, tags: &Tags) -> bool {
        self.classifier.classify(kind, tags) == PrivacyClass::Shareable
    }

    /// Whether this publish goes to public relays
    pub fn should_publish_publicly(&self, kind: Kind, tags: &Tags, wants_public: bool) -> bool {
        wants_public && self.can_publish_publicly(kind, tags)
    }

    /// Evaluate a publish request, keeping the classification for auditing
    pub fn evaluate(&self, kind: Kind, tags: &Tags, wants_public: bool) -> PolicyEvaluation {
        let classification = self.classifier.explain(kind, tags);
        let decision = match (wants_public, classification.class.is_shareable()) {
            (false, _) => PolicyDecision::PrivateOnly,
            (true, true) => PolicyDecision::Public,
            (true, false) => PolicyDecision::Vetoed,
        };
        PolicyEvaluation {
            decision,
            classification,
        }
    }
}
