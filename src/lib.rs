//! Lab Router - Privacy-aware Nostr event routing
//!
//! Decides which relays an event may reach. Everything is published to the
//! LaB's own relay; public relays only ever receive events that are both
//! requested for sharing and classified as shareable.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Publisher                              │
//! │   draft ─► client tag ─► EventSigner ─► signed event             │
//! │                                             │                    │
//! │  ┌──────────────────────────────────────────▼─────────────────┐  │
//! │  │                     RelayResolver                          │  │
//! │  │   Classifier (kind + tags) ─► SharingPolicy (& intent)     │  │
//! │  │   ─► [private relay, public relays if allowed]             │  │
//! │  └──────────────────────────────────────────┬─────────────────┘  │
//! │                                             │ concurrent, 5s each│
//! │         ┌───────────────────────────────────┼──────────┐         │
//! │         ▼                                   ▼          ▼         │
//! │    LaB relay (required)            public relay ... public relay │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`event`]: Nostr event model (kinds, tags, drafts, signed events)
//! - [`privacy`]: Privacy classification and sharing policy
//! - [`routing`]: Relay-set resolution, publish dispatch, HTTP query API
//! - [`relay`]: Relay transport (WebSocket)
//! - [`signer`]: Event signing identities
//! - [`config`]: Configuration management

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod privacy;
pub mod relay;
pub mod routing;
pub mod signer;

pub use config::RouterConfig;
pub use error::{Error, Result};
pub use event::{Event, EventDraft, Kind, Tags};
pub use privacy::{PrivacyClass, SharingPolicy};
pub use routing::{PublishOptions, PublishOutcome, Publisher, RelayResolver, RelaySet};
