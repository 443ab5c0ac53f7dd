//! Publish dispatch
//!
//! One call is a stateless pipeline: tag the draft, sign it, resolve the
//! relay set, send to every relay concurrently and aggregate the results.
//! The private relay is the durability guarantee; public relays are
//! best-effort mirrors.

use super::resolver::{RelayResolver, RelaySet};
use crate::config::{PublishConfig, RouterConfig};
use crate::error::{Error, RelayFailure, Result};
use crate::event::{Event, EventDraft};
use crate::privacy::ClassificationReason;
use crate::relay::RelayTransport;
use crate::signer::EventSigner;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Caller options for a publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// Mirror to public relays if the event's classification allows it
    pub share_to_public: bool,
}

impl PublishOptions {
    /// Private relay only
    pub fn private() -> Self {
        Self {
            share_to_public: false,
        }
    }

    /// Mirror to public relays when allowed
    pub fn public() -> Self {
        Self {
            share_to_public: true,
        }
    }
}

/// Non-fatal conditions worth auditing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Public sharing was requested but the classification forbade it
    PublicSharingVetoed { reason: ClassificationReason },
    /// The private relay accepted but some public relays failed
    PartialPublishDegraded { failures: Vec<RelayFailure> },
}

/// Result of a successful publish
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// The signed event
    pub event: Event,
    /// Relays the event was sent to
    pub relays: RelaySet,
    /// Relays that accepted the event, in relay-set order
    pub accepted: Vec<String>,
    /// Relays that failed or timed out
    pub failed: Vec<RelayFailure>,
    /// Advisories raised during the publish
    pub advisories: Vec<Advisory>,
}

impl PublishOutcome {
    /// Whether public sharing was requested but vetoed
    pub fn was_vetoed(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| matches!(a, Advisory::PublicSharingVetoed { .. }))
    }

    /// Whether some public mirrors failed
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Signs events and dispatches them to the resolved relays
pub struct Publisher {
    resolver: RelayResolver,
    settings: PublishConfig,
    signer: Arc<dyn EventSigner>,
    transport: Arc<dyn RelayTransport>,
}

impl Publisher {
    /// Create a publisher, rejecting invalid relay or dispatch settings
    pub fn new(
        config: &RouterConfig,
        signer: Arc<dyn EventSigner>,
        transport: Arc<dyn RelayTransport>,
    ) -> Result<Self> {
        config.publish.validate()?;
        Ok(Self {
            resolver: RelayResolver::from_config(config)?,
            settings: config.publish.clone(),
            signer,
            transport,
        })
    }

    /// The relay resolver, for pre-publish checks
    pub fn resolver(&self) -> &RelayResolver {
        &self.resolver
    }

    /// Per-relay send timeout
    pub fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    /// Sign and publish a draft
    pub async fn publish(&self, draft: EventDraft, options: PublishOptions) -> Result<PublishOutcome> {
        self.publish_until(draft, options, std::future::pending()).await
    }

    /// Sign and publish a draft, abandoning outstanding sends once `cancel` resolves
    pub async fn publish_until(
        &self,
        draft: EventDraft,
        options: PublishOptions,
        cancel: impl Future<Output = ()>,
    ) -> Result<PublishOutcome> {
        let draft = self.with_client_tag(draft);
        let event = self.signer.sign(draft).await?;

        let decision = self
            .resolver
            .route(event.kind, &event.tags, options.share_to_public);

        let mut advisories = Vec::new();
        if decision.vetoed() {
            let reason = decision.evaluation.classification.reason.clone();
            tracing::warn!(
                event_id = %event.id,
                kind = %event.kind,
                class = %decision.evaluation.classification.class,
                reason = ?reason,
                "Public sharing vetoed, publishing to private relay only"
            );
            advisories.push(Advisory::PublicSharingVetoed { reason });
        }

        let relays = decision.relays;
        let sends = join_all(relays.iter().map(|relay| self.send_one(relay, &event)));
        let results = tokio::select! {
            results = sends => results,
            _ = cancel => {
                tracing::warn!(event_id = %event.id, "Publish cancelled");
                return Err(Error::Cancelled);
            }
        };

        let mut accepted = Vec::new();
        let mut failed = Vec::new();
        for (relay, result) in relays.iter().zip(results) {
            match result {
                Ok(()) => accepted.push(relay.to_string()),
                Err(reason) => failed.push(RelayFailure {
                    relay: relay.to_string(),
                    reason,
                }),
            }
        }

        if accepted.is_empty() {
            tracing::error!(event_id = %event.id, attempted = relays.len(), "All relays unreachable");
            return Err(Error::AllRelaysUnreachable {
                attempted: relays.len(),
                failures: failed,
            });
        }
        if accepted[0] != relays.private_relay() {
            tracing::error!(
                event_id = %event.id,
                relay = relays.private_relay(),
                "Private relay did not accept event"
            );
            return Err(Error::PrivateRelayRejected { failures: failed });
        }

        if !failed.is_empty() {
            tracing::warn!(
                event_id = %event.id,
                failed = failed.len(),
                accepted = accepted.len(),
                "Some public relays failed"
            );
            advisories.push(Advisory::PartialPublishDegraded {
                failures: failed.clone(),
            });
        }

        tracing::info!(
            event_id = %event.id,
            kind = %event.kind,
            requested_public = options.share_to_public,
            public = relays.includes_public(),
            accepted = accepted.len(),
            "Published event"
        );

        Ok(PublishOutcome {
            event,
            relays,
            accepted,
            failed,
            advisories,
        })
    }

    async fn send_one(&self, relay: &str, event: &Event) -> std::result::Result<(), String> {
        let timeout = self.settings.timeout();
        match tokio::time::timeout(timeout, self.transport.send(relay, event)).await {
            Ok(Ok(())) => {
                tracing::debug!(relay, event_id = %event.id, "Relay accepted event");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::debug!(relay, event_id = %event.id, error = %e, "Relay send failed");
                Err(e.to_string())
            }
            Err(_) => {
                tracing::debug!(relay, event_id = %event.id, "Relay send timed out");
                Err(format!("timed out after {}s", timeout.as_secs()))
            }
        }
    }

    fn with_client_tag(&self, mut draft: EventDraft) -> EventDraft {
        if !self.settings.secure_context {
            return draft;
        }
        if let Some(client) = &self.settings.client_tag {
            if !draft.tags.has_name("client") {
                draft.tags.push(["client", client.as_str()]);
            }
        }
        draft
    }
}
