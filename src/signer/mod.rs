//! Event signing
//!
//! The publisher treats signing as an injected capability. [`KeySigner`]
//! signs with a fixed key; [`SessionSigner`] follows the logged-in identity
//! and refuses to sign while nobody is logged in.

mod keys;
mod session;

pub use keys::{KeySigner, Keys};
pub use session::SessionSigner;

use crate::error::Result;
use crate::event::{Event, EventDraft};
use async_trait::async_trait;

/// Signing capability
#[async_trait]
pub trait EventSigner: Send + Sync {
    /// Produce a fully signed event from a draft.
    ///
    /// Fails with `Error::NotAuthenticated` when no identity is available.
    async fn sign(&self, draft: EventDraft) -> Result<Event>;

    /// Hex x-only public key of the current identity, if any
    async fn public_key(&self) -> Option<String>;
}
