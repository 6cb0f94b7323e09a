use crate::crypto::derive_root_key;
use crate::{MacaroonError, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a root key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of an HMAC-SHA3-256 tag in bytes (32 bytes = 256 bits)
pub const TAG_SIZE: usize = 32;

/// A fixed-length key that seeds a macaroon's signature chain.
///
/// Root keys come from [`RootKey::derive`] for issuer secrets, from
/// [`RootKey::generate`] for fresh third-party caveat keys, or from unsealing
/// a third-party caveat during verification. They are wiped from memory on
/// drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RootKey([u8; KEY_SIZE]);

impl RootKey {
    /// Derives a root key from an issuer secret of any length
    ///
    /// # Example
    /// ```
    /// use macaroons::RootKey;
    ///
    /// let a = RootKey::derive(b"this is our super secret key; only we should know it");
    /// let b = RootKey::derive(b"this is our super secret key; only we should know it");
    /// assert_eq!(a.as_bytes(), b.as_bytes());
    /// ```
    pub fn derive(secret: &[u8]) -> Self {
        derive_root_key(secret)
    }

    /// Generates a fresh random root key from the thread-local CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wraps raw key bytes without derivation
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Wraps a raw key slice, which must be exactly [`KEY_SIZE`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| MacaroonError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootKey(<redacted>)")
    }
}

/// The chained authentication tag (signature) of a macaroon.
///
/// Equality is constant-time.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a tag from decoded bytes, which must be exactly [`TAG_SIZE`] long
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let tag: [u8; TAG_SIZE] = bytes
            .try_into()
            .map_err(|_| MacaroonError::InvalidTagLength {
                expected: TAG_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(tag))
    }

    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering, as shown by `inspect`
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl ConstantTimeEq for Tag {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Tag {}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.to_hex())
    }
}
