//! Event privacy classifier
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. never-shareable kind
//! 2. group tag on any kind
//! 3. private-by-default kind
//! 4. private topic or identifier tag
//! 5. shareable kind
//!
//! Anything else is unclassified. Tag rules sit above the shareable kinds so
//! that a plain note tagged to a group or a journal stays private.

use crate::config::PolicyConfig;
use crate::event::{Kind, Tags};
use serde::{Deserialize, Serialize};

/// Privacy category of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyClass {
    /// Group or direct-message content; never leaves the private relay
    NeverShareable,
    /// Personal or application data; kept private
    PrivateByDefault,
    /// Safe to mirror publicly when the author asks for it
    Shareable,
    /// No rule matched; treated as not shareable
    Unclassified,
}

impl PrivacyClass {
    /// Whether events of this class may be mirrored to public relays
    pub fn is_shareable(self) -> bool {
        matches!(self, Self::Shareable)
    }
}

impl std::fmt::Display for PrivacyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverShareable => write!(f, "never_shareable"),
            Self::PrivateByDefault => write!(f, "private_by_default"),
            Self::Shareable => write!(f, "shareable"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// The rule that produced a classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum ClassificationReason {
    /// Kind is in the never-shareable table
    NeverShareableKind,
    /// A group tag scopes the event to a private group
    GroupTag(String),
    /// Kind is in the private-by-default table
    PrivateKind,
    /// Topic tag marks personal reflective content
    PrivateTopic(String),
    /// Identifier tag prefix marks personal reflective content
    PrivateIdentifier(String),
    /// Kind is in the shareable table
    ShareableKind,
    /// No rule matched
    Unlisted,
}

impl ClassificationReason {
    /// Short explanation suitable for a "why can't I share this" prompt
    pub fn describe(&self) -> String {
        match self {
            Self::NeverShareableKind => {
                "Group and direct messages stay inside the LaB".to_string()
            }
            Self::GroupTag(group) => format!("Posted to the private group '{}'", group),
            Self::PrivateKind => "Personal app data and drafts stay private".to_string(),
            Self::PrivateTopic(topic) => format!("'{}' entries are private reflections", topic),
            Self::PrivateIdentifier(id) => format!("'{}' is a private progress record", id),
            Self::ShareableKind => "Can be shared publicly".to_string(),
            Self::Unlisted => "This kind of content is not cleared for public sharing".to_string(),
        }
    }
}

/// Classification result for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Privacy class
    pub class: PrivacyClass,
    /// The rule that decided it
    pub reason: ClassificationReason,
}

/// Classifier over the kind and tag tables of a [`PolicyConfig`]
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    tables: PolicyConfig,
}

impl Classifier {
    /// Create a classifier with the given tables
    pub fn new(tables: PolicyConfig) -> Self {
        Self { tables }
    }

    /// The tables this classifier evaluates
    pub fn tables(&self) -> &PolicyConfig {
        &self.tables
    }

    /// Classify an event by kind and tags
    pub fn classify(&self, kind: Kind, tags: &Tags) -> PrivacyClass {
        self.explain(kind, tags).class
    }

    /// Classify an event and report which rule decided it
    pub fn explain(&self, kind: Kind, tags: &Tags) -> ClassificationResult {
        let t = &self.tables;

        if t.never_shareable_kinds.contains(&kind) {
            return result(PrivacyClass::NeverShareable, ClassificationReason::NeverShareableKind);
        }

        // Any row named after the group tag counts, even without a value.
        if let Some(tag) = tags.iter().find(|tag| tag.name == t.group_tag) {
            let group = tag.value.unwrap_or_default().to_string();
            return result(PrivacyClass::NeverShareable, ClassificationReason::GroupTag(group));
        }

        if t.private_kinds.contains(&kind) {
            return result(PrivacyClass::PrivateByDefault, ClassificationReason::PrivateKind);
        }

        if let Some(reason) = self.private_indicator(tags) {
            return result(PrivacyClass::PrivateByDefault, reason);
        }

        if t.shareable_kinds.contains(&kind) {
            return result(PrivacyClass::Shareable, ClassificationReason::ShareableKind);
        }

        result(PrivacyClass::Unclassified, ClassificationReason::Unlisted)
    }

    fn private_indicator(&self, tags: &Tags) -> Option<ClassificationReason> {
        let t = &self.tables;
        tags.iter().find_map(|tag| {
            let value = tag.value?;
            if t.private_topics.iter().any(|topic| tag.is(&t.topic_tag, topic)) {
                return Some(ClassificationReason::PrivateTopic(value.to_string()));
            }
            if t
                .private_identifier_prefixes
                .iter()
                .any(|prefix| tag.value_starts_with(&t.identifier_tag, prefix))
            {
                return Some(ClassificationReason::PrivateIdentifier(value.to_string()));
            }
            None
        })
    }
}

fn result(class: PrivacyClass, reason: ClassificationReason) -> ClassificationResult {
    ClassificationResult { class, reason }
}
