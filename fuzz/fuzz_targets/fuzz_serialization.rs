#![no_main]

use libfuzzer_sys::fuzz_target;
use macaroons::checker::AcceptAll;
use macaroons::{DischargeSet, Macaroon, Verifier};

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode and survive verification attempts
    if let Ok(token) = Macaroon::from_msgpack(data) {
        let _ = token.to_msgpack();
        let _ = token.to_json();
        let _ = token.inspect();

        let verifier = Verifier::new().with_checker(AcceptAll);
        let discharges = DischargeSet::new();
        let _ = verifier.verify(&token, b"fuzz_secret", &discharges);
    }

    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(token) = Macaroon::from_base64(s) {
            let _ = token.to_msgpack();
        }
        if let Ok(token) = Macaroon::from_hex(s) {
            let _ = token.to_msgpack();
        }
        if let Ok(token) = Macaroon::from_json(s) {
            let _ = token.to_msgpack();
        }
    }
});
