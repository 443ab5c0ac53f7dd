//! Nostr event model
//!
//! The routing core only ever reads `kind` and `tags`; the rest of the
//! event (author, id, signature, timestamp) is filled in by a signer.

mod kind;
mod tags;
mod types;

pub use kind::Kind;
pub use tags::{TagRef, Tags};
pub use types::{Event, EventDraft};
