//! The Nostr event: canonical serialization, identity hashing, signing and
//! signature verification.
//!
//! The event ID is the lowercase hex SHA-256 of the canonical JSON array
//! `[0, pubkey, created_at, kind, tags, content]`, produced with compact
//! separators and NIP-01's minimal escaping (`\"`, `\\`, `\n`, `\r`, `\t`,
//! `\b`, `\f`, `\u00XX` for remaining control bytes, raw UTF-8 for
//! everything else, no HTML escaping). Any deviation changes the ID and
//! breaks interop, so hashing always goes through
//! [`Event::serialize_canonical`].

use hex::FromHex;
use secp256k1::schnorr::Signature;
use secp256k1::{Keypair, Message, Secp256k1, XOnlyPublicKey};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::tag::Tags;
use crate::timestamp::Timestamp;

/// A signed Nostr event, immutable once signed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 64 lowercase hex chars; SHA-256 of the canonical serialization.
    pub id: String,
    /// 64 hex chars; schnorr x-only public key of the author.
    pub pubkey: String,
    pub created_at: Timestamp,
    /// Kind number per the NIP registry, 0..=65535.
    pub kind: u16,
    pub tags: Tags,
    pub content: String,
    /// 128 hex chars; BIP-340 schnorr signature over the event id.
    pub sig: String,
}

impl Event {
    /// Canonical byte serialization used for hashing and signing.
    pub fn serialize_canonical(&self) -> Result<Vec<u8>> {
        let canonical = json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content,
        ]);
        Ok(serde_json::to_vec(&canonical)?)
    }

    /// SHA-256 over the canonical serialization.
    pub fn hash(&self) -> Result<[u8; 32]> {
        let bytes = self.serialize_canonical()?;
        let digest = Sha256::digest(&bytes);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Ok(hash)
    }

    /// The event ID this event should carry, regardless of what `id` holds.
    pub fn compute_id(&self) -> Result<String> {
        Ok(hex::encode(self.hash()?))
    }

    /// Sign the event with a 64-hex-char secret key, filling `pubkey`, `id`
    /// and `sig`. `created_at` is left untouched so callers control the
    /// timestamp that gets hashed.
    pub fn sign(&mut self, secret_key_hex: &str) -> Result<()> {
        let secp = Secp256k1::new();
        let keypair = Keypair::from_seckey_str(&secp, secret_key_hex)
            .map_err(|e| Error::Signature(format!("invalid secret key: {e}")))?;

        self.pubkey = hex::encode(keypair.x_only_public_key().0.serialize());

        let hash = self.hash()?;
        self.id = hex::encode(hash);

        let message = Message::from_digest_slice(&hash).expect("hash length is 32 bytes");
        let sig = secp.sign_schnorr_no_aux_rand(&message, &keypair);
        self.sig = hex::encode(sig.serialize());

        Ok(())
    }

    /// Verify that `id` matches the canonical hash and that `sig` is a valid
    /// schnorr signature by `pubkey` over it.
    pub fn verify(&self) -> Result<()> {
        let hash = self.hash()?;

        if self.id != hex::encode(hash) {
            return Err(Error::InvalidEvent(format!(
                "id mismatch: expected {}, got {}",
                hex::encode(hash),
                self.id
            )));
        }

        let sig_bytes = <[u8; 64]>::from_hex(&self.sig)
            .map_err(|e| Error::Signature(format!("invalid sig hex: {e}")))?;
        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|e| Error::Signature(format!("invalid sig: {e}")))?;

        let pk_bytes = <[u8; 32]>::from_hex(&self.pubkey)
            .map_err(|e| Error::Signature(format!("invalid pubkey hex: {e}")))?;
        let pubkey = XOnlyPublicKey::from_slice(&pk_bytes)
            .map_err(|e| Error::Signature(format!("invalid pubkey: {e}")))?;

        let message = Message::from_digest_slice(&hash).expect("hash length is 32 bytes");
        let secp = Secp256k1::verification_only();
        secp.verify_schnorr(&signature, &message, &pubkey)
            .map_err(|_| Error::Signature("verification failed".to_string()))?;

        Ok(())
    }

    /// Boolean form of [`verify`](Self::verify) for callers that only gate on
    /// the result, like inbound dispatch.
    pub fn check_signature(&self) -> bool {
        self.verify().is_ok()
    }
}
