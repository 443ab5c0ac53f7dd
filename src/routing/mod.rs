//! Relay routing and publish dispatch
//!
//! ```text
//! draft ──► sign ──► classify ──► policy ──► relay set ──► send (concurrent)
//!                                                 │
//!                       private relay (always) ◄──┴──► public relays (if allowed)
//! ```

pub mod handler;
mod publisher;
mod resolver;

pub use handler::{routing_router, RoutingState};
pub use publisher::{Advisory, PublishOptions, PublishOutcome, Publisher};
pub use resolver::{RelayResolver, RelaySet, RoutingDecision};
