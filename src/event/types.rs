//! Event drafts and signed events

use super::{Kind, Tags};
use secp256k1::{schnorr, Message, XOnlyPublicKey, SECP256K1};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An unsigned event as composed by the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub kind: Kind,
    pub content: String,
    #[serde(default)]
    pub tags: Tags,
    /// Unix timestamp in seconds
    pub created_at: u64,
}

impl EventDraft {
    /// Create a draft stamped with the current time
    pub fn new(kind: impl Into<Kind>, content: impl Into<String>, tags: Tags) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
            tags,
            created_at: now(),
        }
    }

    /// Override the creation timestamp
    pub fn created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    /// NIP-01 event id for this draft authored by `pubkey` (hex x-only key)
    pub fn id_for(&self, pubkey: &str) -> [u8; 32] {
        compute_id(pubkey, self.created_at, self.kind, &self.tags, &self.content)
    }
}

/// A signed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: u64,
    pub kind: Kind,
    pub tags: Tags,
    pub content: String,
    pub sig: String,
}

impl Event {
    /// Check that the id matches the content and the signature is valid
    pub fn verify(&self) -> bool {
        let id = compute_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        );
        if hex::encode(id) != self.id {
            return false;
        }

        let Ok(pubkey_bytes) = hex::decode(&self.pubkey) else {
            return false;
        };
        let Ok(pubkey) = XOnlyPublicKey::from_slice(&pubkey_bytes) else {
            return false;
        };
        let Ok(sig_bytes) = hex::decode(&self.sig) else {
            return false;
        };
        let Ok(sig) = schnorr::Signature::from_slice(&sig_bytes) else {
            return false;
        };

        let message = Message::from_digest(id);
        SECP256K1.verify_schnorr(&sig, &message, &pubkey).is_ok()
    }
}

/// sha256 over `[0, pubkey, created_at, kind, tags, content]`
fn compute_id(pubkey: &str, created_at: u64, kind: Kind, tags: &Tags, content: &str) -> [u8; 32] {
    let serialized = serde_json::json!([0, pubkey, created_at, kind, tags, content]);
    Sha256::digest(serialized.to_string().as_bytes()).into()
}

fn now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
