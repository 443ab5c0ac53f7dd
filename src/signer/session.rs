//! Signer following the logged-in identity

use super::{EventSigner, Keys};
use crate::error::{Error, Result};
use crate::event::{Event, EventDraft};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Signer whose identity can be swapped at runtime
#[derive(Debug, Default)]
pub struct SessionSigner {
    keys: RwLock<Option<Keys>>,
}

impl SessionSigner {
    /// Create a signer with nobody logged in
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signer already logged in as `keys`
    pub fn with_keys(keys: Keys) -> Self {
        Self {
            keys: RwLock::new(Some(keys)),
        }
    }

    /// Switch to a new identity
    pub async fn login(&self, keys: Keys) {
        tracing::info!(pubkey = %keys.public_key(), "Signer logged in");
        *self.keys.write().await = Some(keys);
    }

    /// Drop the current identity
    pub async fn logout(&self) {
        if self.keys.write().await.take().is_some() {
            tracing::info!("Signer logged out");
        }
    }

    /// Whether an identity is available
    pub async fn is_logged_in(&self) -> bool {
        self.keys.read().await.is_some()
    }
}

#[async_trait]
impl EventSigner for SessionSigner {
    async fn sign(&self, draft: EventDraft) -> Result<Event> {
        let keys = self.keys.read().await;
        let keys = keys.as_ref().ok_or(Error::NotAuthenticated)?;
        keys.sign_draft(draft)
    }

    async fn public_key(&self) -> Option<String> {
        self.keys
            .read()
            .await
            .as_ref()
            .map(|keys| keys.public_key().to_string())
    }
}
