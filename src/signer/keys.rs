//! secp256k1 keys and the fixed-key signer

use super::EventSigner;
use crate::error::{Error, Result};
use crate::event::{Event, EventDraft};
use async_trait::async_trait;
use rand::RngCore;
use secp256k1::{Keypair, Message, SecretKey, XOnlyPublicKey, SECP256K1};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw secret key bytes, wiped on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct SecretBytes([u8; 32]);

/// A Nostr identity: secret key plus its hex x-only public key
#[derive(Clone)]
pub struct Keys {
    secret: SecretBytes,
    public_key: String,
}

impl Keys {
    /// Generate a new random identity
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        loop {
            rand::thread_rng().fill_bytes(&mut bytes);
            if let Ok(keys) = Self::from_bytes(bytes) {
                bytes.zeroize();
                return keys;
            }
        }
    }

    /// Import a 32-byte secret key
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        let secret = SecretKey::from_slice(&bytes)
            .map_err(|e| Error::Config(format!("invalid secret key: {}", e)))?;
        let keypair = Keypair::from_secret_key(SECP256K1, &secret);
        let (xonly, _) = XOnlyPublicKey::from_keypair(&keypair);
        Ok(Self {
            secret: SecretBytes(bytes),
            public_key: hex::encode(xonly.serialize()),
        })
    }

    /// Import a hex-encoded secret key
    pub fn from_hex(secret_hex: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(secret_hex.trim(), &mut bytes)
            .map_err(|e| Error::Config(format!("invalid secret key hex: {}", e)))?;
        let keys = Self::from_bytes(bytes);
        bytes.zeroize();
        keys
    }

    /// Hex x-only public key
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Sign a draft
    pub fn sign_draft(&self, draft: EventDraft) -> Result<Event> {
        if let Some(index) = draft.tags.as_rows().iter().position(|row| row.is_empty()) {
            return Err(Error::SigningFailed(format!("tag row {} has no name", index)));
        }

        let secret = SecretKey::from_slice(&self.secret.0)
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        let keypair = Keypair::from_secret_key(SECP256K1, &secret);

        let id = draft.id_for(&self.public_key);
        let message = Message::from_digest(id);
        let sig = SECP256K1.sign_schnorr_no_aux_rand(&message, &keypair);

        Ok(Event {
            id: hex::encode(id),
            pubkey: self.public_key.clone(),
            created_at: draft.created_at,
            kind: draft.kind,
            tags: draft.tags,
            content: draft.content,
            sig: hex::encode(sig.serialize()),
        })
    }
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Signer bound to a single identity
#[derive(Debug, Clone)]
pub struct KeySigner {
    keys: Keys,
}

impl KeySigner {
    /// Sign every draft with `keys`
    pub fn new(keys: Keys) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl EventSigner for KeySigner {
    async fn sign(&self, draft: EventDraft) -> Result<Event> {
        self.keys.sign_draft(draft)
    }

    async fn public_key(&self) -> Option<String> {
        Some(self.keys.public_key().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Kind, Tags};

    const SECRET_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_known_public_key() {
        let keys = Keys::from_hex(SECRET_ONE).unwrap();
        assert_eq!(
            keys.public_key(),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_invalid_secret_rejected() {
        assert!(Keys::from_hex("zz").is_err());
        assert!(Keys::from_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keys = Keys::from_hex(SECRET_ONE).unwrap();
        let debug = format!("{:?}", keys);
        assert!(!debug.contains(SECRET_ONE));
        assert!(debug.contains("79be667e"));
    }

    #[tokio::test]
    async fn test_signed_event_verifies() {
        let signer = KeySigner::new(Keys::generate());
        let draft = EventDraft::new(
            Kind::TEXT_NOTE,
            "gm lab",
            Tags::from_rows([["t", "gm"]]),
        );
        let event = signer.sign(draft.clone()).await.unwrap();

        assert!(event.verify());
        assert_eq!(event.kind, draft.kind);
        assert_eq!(event.tags, draft.tags);
        assert_eq!(event.content, "gm lab");
        assert_eq!(Some(event.pubkey.clone()), signer.public_key().await);
        assert_eq!(event.id.len(), 64);
        assert_eq!(event.sig.len(), 128);
    }

    #[tokio::test]
    async fn test_tampered_event_fails_verification() {
        let signer = KeySigner::new(Keys::generate());
        let mut event = signer
            .sign(EventDraft::new(Kind::TEXT_NOTE, "original", Tags::new()))
            .await
            .unwrap();
        event.content = "edited".to_string();
        assert!(!event.verify());
    }

    #[tokio::test]
    async fn test_empty_tag_row_rejected() {
        let signer = KeySigner::new(Keys::generate());
        let draft = EventDraft::new(Kind::TEXT_NOTE, "x", Tags::from(vec![vec![]]));
        let err = signer.sign(draft).await.unwrap_err();
        assert!(matches!(err, Error::SigningFailed(_)));
    }
}
