use crate::caveat::Caveat;
use crate::crypto::{bind, extend, extend_third_party, seed};
use crate::key::{RootKey, Tag};
use crate::seal::seal;
use crate::verifier::DischargeSet;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// A macaroon is a bearer credential with embedded, attenuating caveats.
///
/// Macaroons use chained HMAC-SHA3-256 signatures, so any holder can narrow
/// the authority of a macaroon without contacting its issuer. Values are
/// immutable: adding a caveat returns a new macaroon and leaves the original
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macaroon {
    location: Option<String>,
    identifier: Vec<u8>,
    caveats: Vec<Caveat>,
    signature: Tag,
}

impl Macaroon {
    /// Mints a new macaroon from an issuer secret
    ///
    /// The secret is first normalized into a [`RootKey`].
    ///
    /// # Example
    /// ```
    /// use macaroons::Macaroon;
    ///
    /// let secret = b"this is our super secret key; only we should know it";
    /// let macaroon = Macaroon::create(secret, b"we used our secret key", Some("http://mybank/"));
    /// assert!(macaroon.is_unrestricted());
    /// ```
    pub fn create(
        secret: &[u8],
        identifier: impl Into<Vec<u8>>,
        location: Option<impl Into<String>>,
    ) -> Self {
        Self::with_root_key(&RootKey::derive(secret), identifier, location)
    }

    /// Mints a new macaroon directly from a root key
    ///
    /// Third-party authorities use this to issue discharge macaroons with the
    /// key they were given for a caveat.
    pub fn with_root_key(
        root_key: &RootKey,
        identifier: impl Into<Vec<u8>>,
        location: Option<impl Into<String>>,
    ) -> Self {
        let identifier = identifier.into();
        let signature = seed(root_key, &identifier);

        Self {
            location: location.map(Into::into),
            identifier,
            caveats: Vec::new(),
            signature,
        }
    }

    /// Reassembles a macaroon from decoded parts without recomputing anything
    ///
    /// Used by decoding layers; the result is only trustworthy once verified.
    pub fn from_parts(
        location: Option<String>,
        identifier: Vec<u8>,
        caveats: Vec<Caveat>,
        signature: Tag,
    ) -> Self {
        Self {
            location,
            identifier,
            caveats,
            signature,
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    pub fn caveats(&self) -> &[Caveat] {
        &self.caveats
    }

    pub fn signature(&self) -> &Tag {
        &self.signature
    }

    /// Returns the number of caveats in this macaroon
    pub fn caveat_count(&self) -> usize {
        self.caveats.len()
    }

    /// Returns true if this macaroon has no caveats
    pub fn is_unrestricted(&self) -> bool {
        self.caveats.is_empty()
    }

    /// Returns a copy of this macaroon restricted by a first-party caveat
    ///
    /// No secret is needed: the caveat is chained onto the current signature.
    ///
    /// # Example
    /// ```
    /// use macaroons::Macaroon;
    ///
    /// let original = Macaroon::create(b"secret", b"identifier", None::<String>);
    /// let restricted = original
    ///     .add_first_party_caveat(b"account = alice")
    ///     .add_first_party_caveat(b"time < 2025-12-31T23:59:59Z");
    ///
    /// assert_eq!(original.caveat_count(), 0);
    /// assert_eq!(restricted.caveat_count(), 2);
    /// ```
    pub fn add_first_party_caveat(&self, predicate: impl Into<Vec<u8>>) -> Self {
        let predicate = predicate.into();
        let signature = extend(&self.signature, &predicate);

        self.attenuated(Caveat::first_party(predicate), signature)
    }

    /// Returns a copy of this macaroon restricted by a third-party caveat
    ///
    /// `caveat_key` becomes the root key of the discharge macaroon; it is
    /// sealed under the current signature so only a verifier able to
    /// recompute that signature can recover it. The authority at `location`
    /// must learn the key and the condition from `identifier` by some
    /// out-of-band agreement.
    ///
    /// # Example
    /// ```
    /// use macaroons::{Macaroon, RootKey};
    ///
    /// let caveat_key = RootKey::generate();
    /// let macaroon = Macaroon::create(b"secret", b"identifier", Some("http://mybank/"))
    ///     .add_third_party_caveat("http://auth.mybank/", &caveat_key, b"user = alice");
    ///
    /// assert!(macaroon.caveats()[0].is_third_party());
    /// ```
    pub fn add_third_party_caveat(
        &self,
        location: impl Into<String>,
        caveat_key: &RootKey,
        identifier: impl Into<Vec<u8>>,
    ) -> Self {
        let identifier = identifier.into();
        let (verification_id, _nonce) = seal(&self.signature, caveat_key);
        let signature = extend_third_party(&self.signature, &verification_id, &identifier);

        self.attenuated(
            Caveat::third_party(location, verification_id, identifier),
            signature,
        )
    }

    fn attenuated(&self, caveat: Caveat, signature: Tag) -> Self {
        let mut caveats = Vec::with_capacity(self.caveats.len() + 1);
        caveats.extend_from_slice(&self.caveats);
        caveats.push(caveat);

        Self {
            location: self.location.clone(),
            identifier: self.identifier.clone(),
            caveats,
            signature,
        }
    }

    /// Binds a discharge macaroon to this macaroon's signature
    ///
    /// The bound discharge only verifies when presented together with this
    /// macaroon, so it cannot be replayed alongside another one.
    pub fn bind_discharge(&self, discharge: &Macaroon) -> Macaroon {
        Macaroon {
            signature: bind(&self.signature, &discharge.signature),
            ..discharge.clone()
        }
    }

    /// Prepares this macaroon for a request by binding all discharge macaroons
    ///
    /// # Example
    /// ```
    /// use macaroons::{Macaroon, RootKey};
    ///
    /// let caveat_key = RootKey::generate();
    /// let primary = Macaroon::create(b"secret", b"primary", None::<String>)
    ///     .add_third_party_caveat("https://auth.example.com", &caveat_key, b"auth_required");
    ///
    /// let discharge = Macaroon::with_root_key(&caveat_key, b"auth_required", None::<String>);
    /// let discharges = primary.prepare_for_request([discharge]);
    /// assert!(discharges.get(b"auth_required").is_some());
    /// ```
    pub fn prepare_for_request(
        &self,
        discharges: impl IntoIterator<Item = Macaroon>,
    ) -> DischargeSet {
        discharges
            .into_iter()
            .map(|discharge| self.bind_discharge(&discharge))
            .collect()
    }

    /// Renders the macaroon as human-readable `key value` packet lines
    ///
    /// Third-party verification-ids are shown in base64, the signature in hex.
    pub fn inspect(&self) -> String {
        let mut lines = Vec::with_capacity(3 + 3 * self.caveats.len());

        if let Some(location) = &self.location {
            lines.push(format!("location {location}"));
        }
        lines.push(format!("identifier {}", String::from_utf8_lossy(&self.identifier)));

        for caveat in &self.caveats {
            lines.push(format!("cid {}", String::from_utf8_lossy(caveat.caveat_id())));
            if let Caveat::ThirdParty {
                location,
                verification_id,
                ..
            } = caveat
            {
                lines.push(format!("vid {}", STANDARD.encode(verification_id)));
                lines.push(format!("cl {location}"));
            }
        }

        lines.push(format!("signature {}", self.signature.to_hex()));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
