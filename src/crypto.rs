use crate::key::{KEY_SIZE, RootKey, TAG_SIZE, Tag};
use hmac::{Hmac, Mac};
use sha3::Sha3_256;

type HmacSha3 = Hmac<Sha3_256>;

/// HMAC key reserved for turning issuer secrets into root keys:
/// `macaroons-key-generator` right-padded with zero bytes.
const KEY_GENERATOR: [u8; KEY_SIZE] = *b"macaroons-key-generator\0\0\0\0\0\0\0\0\0";

/// All-zero HMAC key used when binding a discharge to its authorizing macaroon
const ZERO_KEY: [u8; KEY_SIZE] = [0u8; KEY_SIZE];

/// Generates an HMAC-SHA3-256 signature
///
/// # Arguments
/// * `key` - The secret key
/// * `message` - The message to authenticate
pub fn hmac_sha3(key: &[u8], message: &[u8]) -> [u8; TAG_SIZE] {
    let mut mac = HmacSha3::new_from_slice(key).expect("HMAC can take key of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Normalizes an issuer secret of any length into a 32-byte root key
pub fn derive_root_key(secret: &[u8]) -> RootKey {
    RootKey::from_bytes(hmac_sha3(&KEY_GENERATOR, secret))
}

/// Starts a signature chain: `HMAC(root_key, identifier)`
pub fn seed(root_key: &RootKey, identifier: &[u8]) -> Tag {
    Tag::from_bytes(hmac_sha3(root_key.as_bytes(), identifier))
}

/// Extends a signature chain by one caveat: `HMAC(previous_tag, caveat_bytes)`
///
/// The previous tag is the key of the next step, so any change to an earlier
/// caveat changes every tag after it.
pub fn extend(tag: &Tag, caveat_bytes: &[u8]) -> Tag {
    Tag::from_bytes(hmac_sha3(tag.as_bytes(), caveat_bytes))
}

/// Extends a signature chain by a third-party caveat, folding in
/// `verification_id || caveat_identifier`
pub fn extend_third_party(tag: &Tag, verification_id: &[u8], caveat_identifier: &[u8]) -> Tag {
    let mut mac =
        HmacSha3::new_from_slice(tag.as_bytes()).expect("HMAC can take key of any length");
    mac.update(verification_id);
    mac.update(caveat_identifier);
    Tag::from_bytes(mac.finalize().into_bytes().into())
}

/// Binds a discharge signature to the signature of the macaroon it authorizes
///
/// This computes: `HMAC(Z, HMAC(Z, authorizing) XOR HMAC(Z, discharge))`
/// with `Z` the all-zero key.
pub fn bind(authorizing: &Tag, discharge: &Tag) -> Tag {
    let h1 = hmac_sha3(&ZERO_KEY, authorizing.as_bytes());
    let h2 = hmac_sha3(&ZERO_KEY, discharge.as_bytes());

    let mut combined = [0u8; TAG_SIZE];
    for (out, (a, b)) in combined.iter_mut().zip(h1.iter().zip(h2.iter())) {
        *out = a ^ b;
    }

    Tag::from_bytes(hmac_sha3(&ZERO_KEY, &combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha3_deterministic() {
        let key = b"secret key";
        let message = b"hello world";

        let sig1 = hmac_sha3(key, message);
        let sig2 = hmac_sha3(key, message);

        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), TAG_SIZE);
    }

    #[test]
    fn test_hmac_sha3_different_keys() {
        assert_ne!(hmac_sha3(b"key1", b"hello"), hmac_sha3(b"key2", b"hello"));
    }

    #[test]
    fn test_key_generator_constant() {
        assert_eq!(&KEY_GENERATOR[..23], b"macaroons-key-generator");
        assert!(KEY_GENERATOR[23..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_derive_root_key_normalizes_length() {
        let short = derive_root_key(b"k");
        let long = derive_root_key(&[0x42; 500]);

        assert_eq!(short.as_bytes().len(), KEY_SIZE);
        assert_eq!(long.as_bytes().len(), KEY_SIZE);
        assert_ne!(short.as_bytes(), long.as_bytes());
        assert_eq!(derive_root_key(b"k").as_bytes(), short.as_bytes());
    }

    #[test]
    fn test_derived_key_is_not_the_secret() {
        let secret = [9u8; KEY_SIZE];
        assert_ne!(derive_root_key(&secret).as_bytes(), &secret);
    }

    #[test]
    fn test_chain_reconstruction() {
        let root_key = derive_root_key(b"root secret");

        let sig1 = seed(&root_key, b"my macaroon");
        let sig2 = extend(&sig1, b"account = alice");
        let sig3 = extend(&sig2, b"action = read");

        assert_ne!(sig1, sig2);
        assert_ne!(sig2, sig3);

        let rebuilt = seed(&root_key, b"my macaroon");
        let rebuilt = extend(&rebuilt, b"account = alice");
        let rebuilt = extend(&rebuilt, b"action = read");
        assert_eq!(rebuilt, sig3);
    }

    #[test]
    fn test_chain_order_matters() {
        let start = seed(&derive_root_key(b"key"), b"id");

        let ab = extend(&extend(&start, b"a"), b"b");
        let ba = extend(&extend(&start, b"b"), b"a");

        assert_ne!(ab, ba);
    }

    #[test]
    fn test_extend_third_party_concatenates() {
        let start = seed(&derive_root_key(b"key"), b"id");

        let streamed = extend_third_party(&start, b"vid-bytes", b"caveat-id");
        let joined = extend(&start, b"vid-bytescaveat-id");

        assert_eq!(streamed, joined);
    }

    #[test]
    fn test_bind_depends_on_both_tags() {
        let a = seed(&derive_root_key(b"a"), b"root");
        let b = seed(&derive_root_key(b"b"), b"root");
        let d = seed(&derive_root_key(b"d"), b"discharge");

        let bound_a = bind(&a, &d);
        let bound_b = bind(&b, &d);

        assert_ne!(bound_a, d);
        assert_ne!(bound_a, bound_b);
        assert_eq!(bound_a, bind(&a, &d));
    }
}
