//! Framing for storing and transmitting macaroons.
//!
//! None of these encodings is covered by a macaroon's signature; a decoded
//! macaroon is only trustworthy after [`Verifier::verify`](crate::Verifier::verify).

use crate::{Macaroon, MacaroonError, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use std::fmt::Display;

fn codec_error(err: impl Display) -> MacaroonError {
    MacaroonError::DeserializationError(err.to_string())
}

impl Macaroon {
    /// Serializes this macaroon to JSON
    ///
    /// # Example
    /// ```
    /// use macaroons::Macaroon;
    ///
    /// let macaroon = Macaroon::create(b"secret", b"my-identifier", Some("http://example.com/"))
    ///     .add_first_party_caveat(b"account = alice");
    ///
    /// let json = macaroon.to_json().unwrap();
    /// assert_eq!(Macaroon::from_json(&json).unwrap(), macaroon);
    /// ```
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(codec_error)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(codec_error)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(codec_error)
    }

    /// Serializes this macaroon to MessagePack, the compact binary form used
    /// by the base64 and hex encodings
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(codec_error)
    }

    pub fn from_msgpack(data: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(data).map_err(codec_error)
    }

    /// Serializes this macaroon to URL-safe base64 without padding, suitable
    /// for HTTP headers and cookies
    ///
    /// # Example
    /// ```
    /// use macaroons::Macaroon;
    ///
    /// let macaroon = Macaroon::create(b"secret", b"my-identifier", None::<String>);
    /// let token = macaroon.to_base64().unwrap();
    /// assert!(!token.contains('='));
    /// assert_eq!(Macaroon::from_base64(&token).unwrap(), macaroon);
    /// ```
    pub fn to_base64(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.to_msgpack()?))
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(codec_error)?;
        Self::from_msgpack(&bytes)
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_msgpack()?))
    }

    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded.trim()).map_err(codec_error)?;
        Self::from_msgpack(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DischargeSet, RootKey, Verifier};

    fn sample() -> (Macaroon, RootKey) {
        let caveat_key = RootKey::generate();
        let macaroon = Macaroon::create(b"secret", b"my-identifier", Some("http://example.com/"))
            .add_first_party_caveat(b"account = alice")
            .add_third_party_caveat("https://auth.example.com", &caveat_key, b"external_check");
        (macaroon, caveat_key)
    }

    #[test]
    fn test_decoded_macaroon_still_verifies() {
        let (original, caveat_key) = sample();
        let discharge = Macaroon::with_root_key(&caveat_key, b"external_check", None::<String>);
        let discharges: DischargeSet = original.prepare_for_request([discharge]);

        let decoded = Macaroon::from_base64(&original.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, original);

        let verifier = Verifier::new().satisfy_exact("account = alice");
        assert!(verifier.verify(&decoded, b"secret", &discharges).is_ok());
    }

    #[test]
    fn test_all_encodings_agree() {
        let (original, _) = sample();

        assert_eq!(Macaroon::from_json(&original.to_json().unwrap()).unwrap(), original);
        assert_eq!(
            Macaroon::from_json(&original.to_json_pretty().unwrap()).unwrap(),
            original
        );
        assert_eq!(Macaroon::from_msgpack(&original.to_msgpack().unwrap()).unwrap(), original);
        assert_eq!(Macaroon::from_hex(&original.to_hex().unwrap()).unwrap(), original);
    }

    #[test]
    fn test_msgpack_is_compact() {
        let (macaroon, _) = sample();
        assert!(macaroon.to_msgpack().unwrap().len() < macaroon.to_json().unwrap().len());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            Macaroon::from_json("not valid json"),
            Err(MacaroonError::DeserializationError(_))
        ));
        assert!(Macaroon::from_base64("!!!invalid base64!!!").is_err());
        assert!(Macaroon::from_hex("zzz").is_err());
        assert!(Macaroon::from_msgpack(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_truncated_signature_is_rejected() {
        let (macaroon, _) = sample();
        let json = macaroon.to_json().unwrap();

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["signature"].as_array_mut().unwrap().pop();

        assert!(Macaroon::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_cross_format_incompatibility() {
        let (macaroon, _) = sample();
        let json = macaroon.to_json().unwrap();
        assert!(Macaroon::from_msgpack(json.as_bytes()).is_err());
    }
}
