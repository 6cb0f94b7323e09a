//! Authenticated encryption of third-party caveat keys.
//!
//! A third-party caveat carries the discharge root key sealed under a key
//! derived from the macaroon's tag at the moment the caveat was added. The
//! sealed form, the verification-id, is `nonce || ciphertext || auth_tag`.

use crate::crypto::hmac_sha3;
use crate::key::{KEY_SIZE, RootKey, Tag};
use crate::{MacaroonError, Result};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use zeroize::Zeroizing;

/// XChaCha20-Poly1305 nonce size (192 bits)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 authentication tag size
pub const AUTH_TAG_SIZE: usize = 16;

/// Length of every verification-id produced by [`seal`]
pub const VERIFICATION_ID_SIZE: usize = NONCE_SIZE + KEY_SIZE + AUTH_TAG_SIZE;

/// HMAC message used to derive the sealing key from a tag
const SEALING_DOMAIN: &[u8] = b"macaroons-caveat-sealing-key";

fn cipher_for(tag: &Tag) -> XChaCha20Poly1305 {
    let sealing_key = Zeroizing::new(hmac_sha3(tag.as_bytes(), SEALING_DOMAIN));
    XChaCha20Poly1305::new(Key::from_slice(sealing_key.as_slice()))
}

/// Seals a discharge root key under the current tag
///
/// # Returns
/// The verification-id and the fresh nonce embedded at its front
pub fn seal(tag: &Tag, discharge_key: &RootKey) -> (Vec<u8>, [u8; NONCE_SIZE]) {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher_for(tag)
        .encrypt(XNonce::from_slice(&nonce), discharge_key.as_bytes().as_slice())
        .expect("XChaCha20-Poly1305 can encrypt a 32-byte key");

    let mut verification_id = Vec::with_capacity(VERIFICATION_ID_SIZE);
    verification_id.extend_from_slice(&nonce);
    verification_id.extend_from_slice(&ciphertext);

    (verification_id, nonce)
}

/// Recovers the discharge root key from a verification-id
///
/// Every failure is reported as [`MacaroonError::IntegrityFailure`],
/// whatever its cause.
pub fn unseal(tag: &Tag, verification_id: &[u8]) -> Result<RootKey> {
    if verification_id.len() != VERIFICATION_ID_SIZE {
        return Err(MacaroonError::IntegrityFailure);
    }

    let (nonce, sealed) = verification_id.split_at(NONCE_SIZE);
    let plaintext = cipher_for(tag)
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map(Zeroizing::new)
        .map_err(|_| MacaroonError::IntegrityFailure)?;

    RootKey::from_slice(&plaintext).map_err(|_| MacaroonError::IntegrityFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_root_key, extend, seed};

    fn sample_tag(identifier: &[u8]) -> Tag {
        seed(&derive_root_key(b"issuer secret"), identifier)
    }

    #[test]
    fn test_seal_unseal_roundtrip() {
        let tag = sample_tag(b"id");
        let key = RootKey::generate();

        let (verification_id, nonce) = seal(&tag, &key);
        assert_eq!(verification_id.len(), VERIFICATION_ID_SIZE);
        assert_eq!(&verification_id[..NONCE_SIZE], &nonce);

        let recovered = unseal(&tag, &verification_id).unwrap();
        assert_eq!(recovered.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_seal_uses_fresh_nonce() {
        let tag = sample_tag(b"id");
        let key = RootKey::generate();

        let (first, _) = seal(&tag, &key);
        let (second, _) = seal(&tag, &key);

        assert_ne!(first, second);
    }

    #[test]
    fn test_unseal_with_wrong_tag() {
        let tag = sample_tag(b"id");
        let other = extend(&tag, b"account = alice");
        let (verification_id, _) = seal(&tag, &RootKey::generate());

        assert_eq!(
            unseal(&other, &verification_id).unwrap_err(),
            MacaroonError::IntegrityFailure
        );
    }

    #[test]
    fn test_unseal_detects_tampering() {
        let tag = sample_tag(b"id");
        let (verification_id, _) = seal(&tag, &RootKey::generate());

        for position in [0, NONCE_SIZE, NONCE_SIZE + KEY_SIZE, VERIFICATION_ID_SIZE - 1] {
            let mut tampered = verification_id.clone();
            tampered[position] ^= 0x01;
            assert_eq!(
                unseal(&tag, &tampered).unwrap_err(),
                MacaroonError::IntegrityFailure
            );
        }
    }

    #[test]
    fn test_unseal_rejects_wrong_length() {
        let tag = sample_tag(b"id");
        let (verification_id, _) = seal(&tag, &RootKey::generate());

        assert_eq!(
            unseal(&tag, &verification_id[..VERIFICATION_ID_SIZE - 1]).unwrap_err(),
            MacaroonError::IntegrityFailure
        );
        assert_eq!(unseal(&tag, &[]).unwrap_err(), MacaroonError::IntegrityFailure);
    }
}
