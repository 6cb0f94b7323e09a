use color_eyre::Result;
use macaroons::checker::{AcceptAll, ContextChecker};
use macaroons::{DischargeSet, Macaroon, RootKey, Verifier};

fn main() -> Result<()> {
    color_eyre::install()?;

    println!("=== Third-Party Caveats and Discharge Macaroons ===\n");

    let secret = b"service_root_secret";

    // The service and the auth service agree on a key per caveat, e.g. by
    // encrypting it into the caveat identifier for the auth service
    let auth_key = RootKey::generate();

    // Step 1: Service mints a macaroon that requires authentication
    println!("1. Service creates macaroon with a third-party caveat");
    let primary = Macaroon::create(secret, b"session-12345", Some("https://api.service.com"))
        .add_first_party_caveat("resource = /api/documents")
        .add_third_party_caveat("https://auth.service.com", &auth_key, "user_authenticated");
    println!("   Caveats: {}", primary.caveat_count());

    // Step 2: Verification without a discharge fails
    println!("\n2. Verifying without a discharge macaroon...");
    let verifier = Verifier::new().with_checker(
        ContextChecker::empty()
            .with("resource", "/api/documents")
            .with("auth_level", "10"),
    );
    match verifier.verify(&primary, secret, &DischargeSet::new()) {
        Ok(()) => println!("   ✗ Unexpectedly succeeded"),
        Err(e) => println!("   ✓ Correctly failed: {e}"),
    }

    // Step 3: The auth service issues a discharge with its own caveat
    println!("\n3. Auth service issues a discharge macaroon (auth_level >= 5)");
    let discharge =
        Macaroon::with_root_key(&auth_key, "user_authenticated", Some("https://auth.service.com"))
            .add_first_party_caveat("auth_level >= 5");

    // Step 4: The client binds it to the primary macaroon before sending both
    println!("\n4. Client binds the discharge to the primary macaroon");
    let discharges = primary.prepare_for_request([discharge.clone()]);

    println!("\n5. Service verifies macaroon and discharge...");
    match verifier.verify(&primary, secret, &discharges) {
        Ok(()) => println!("   ✓ Access granted"),
        Err(e) => println!("   ✗ Verification failed: {e}"),
    }

    // Step 6: An unbound discharge is rejected
    println!("\n6. Presenting the discharge without binding it...");
    let unbound: DischargeSet = [discharge].into_iter().collect();
    match verifier.verify(&primary, secret, &unbound) {
        Ok(()) => println!("   ✗ Unexpectedly succeeded"),
        Err(e) => println!("   ✓ Correctly failed: {e}"),
    }

    // Step 7: Two authorities
    println!("\n7. Macaroon with two third-party caveats...");
    let payment_key = RootKey::generate();
    let premium = Macaroon::create(secret, b"premium-session", None::<String>)
        .add_third_party_caveat("https://auth.service.com", &auth_key, "user_authenticated")
        .add_third_party_caveat("https://payments.service.com", &payment_key, "payment_verified");

    let discharges = premium.prepare_for_request([
        Macaroon::with_root_key(&auth_key, "user_authenticated", None::<String>),
        Macaroon::with_root_key(&payment_key, "payment_verified", None::<String>),
    ]);

    match Verifier::new().with_checker(AcceptAll).verify(&premium, secret, &discharges) {
        Ok(()) => println!("   ✓ All third-party caveats satisfied"),
        Err(e) => println!("   ✗ Verification failed: {e}"),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
