//! Event privacy classification and sharing policy
//!
//! Decides, from an event's kind and tags alone, whether it may ever be
//! mirrored to public relays. Everything here is pure and stateless.

pub mod classifier;
mod policy;

pub use classifier::{ClassificationReason, ClassificationResult, Classifier, PrivacyClass};
pub use policy::{PolicyDecision, PolicyEvaluation, SharingPolicy};
