#![no_main]

use libfuzzer_sys::fuzz_target;
use macaroons::checker::AcceptAll;
use macaroons::{DischargeSet, Macaroon, RootKey, Verifier};

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }

    let split_point = data.len() / 2;
    let secret = &data[..split_point];
    let identifier = &data[split_point..];

    let mut token = Macaroon::create(secret, identifier, None::<String>);
    for chunk in data.chunks((data.len() / 4).max(1)) {
        token = token.add_first_party_caveat(chunk);
    }

    let verifier = Verifier::new().with_checker(AcceptAll);
    let empty = DischargeSet::new();
    assert!(verifier.is_valid(&token, secret, &empty));

    let mut wrong_secret = secret.to_vec();
    wrong_secret[0] ^= 0xFF;
    assert!(!verifier.is_valid(&token, &wrong_secret, &empty));

    // Attach a third-party caveat and discharge it
    let caveat_key = RootKey::derive(&data[..data.len() / 3]);
    let caveat_id = &data[data.len() / 3..];
    let token = token.add_third_party_caveat("http://example.com", &caveat_key, caveat_id);

    let discharge = Macaroon::with_root_key(&caveat_key, caveat_id, None::<String>);
    let discharges = token.prepare_for_request([discharge.clone()]);
    assert!(verifier.is_valid(&token, secret, &discharges));

    let unbound: DischargeSet = [discharge].into_iter().collect();
    assert!(!verifier.is_valid(&token, secret, &unbound));
});
