use color_eyre::Result;
use macaroons::checker::ContextChecker;
use macaroons::{DischargeSet, Macaroon, Verifier};

fn main() -> Result<()> {
    color_eyre::install()?;

    println!("=== Macaroon Basic Usage Example ===\n");

    // Step 1: Mint a new macaroon
    let secret = b"this is a super secret key";
    let macaroon = Macaroon::create(secret, b"user-session-12345", Some("https://api.example.com"));
    println!(
        "1. Minted macaroon with identifier: {:?}",
        String::from_utf8_lossy(macaroon.identifier())
    );

    // Step 2: Attenuate it; each call returns a new, narrower macaroon
    let macaroon = macaroon
        .add_first_party_caveat("account = alice")
        .add_first_party_caveat("action = read")
        .add_first_party_caveat("time < 2030-01-01T00:00:00Z");

    println!("\n2. Added caveats:");
    for (i, caveat) in macaroon.caveats().iter().enumerate() {
        println!("   {}. {}", i + 1, String::from_utf8_lossy(caveat.caveat_id()));
    }

    // Step 3: Encode it for transmission
    let token = macaroon.to_base64()?;
    println!("\n3. Encoded token ({} chars): {token}", token.len());
    println!("\n{}", macaroon.inspect());

    // Step 4: The service decodes and verifies the token
    let received = Macaroon::from_base64(&token)?;
    let context = ContextChecker::empty()
        .with("account", "alice")
        .with("action", "read")
        .with("time", "2026-10-19T09:00:00Z");
    let verifier = Verifier::new().with_checker(context);

    println!("4. Verifying as alice reading...");
    match verifier.verify(&received, secret, &DischargeSet::new()) {
        Ok(()) => println!("   ✓ Access granted"),
        Err(e) => println!("   ✗ Access denied: {e}"),
    }

    // Step 5: The same token does not allow writing
    let write_verifier = Verifier::new().with_checker(
        ContextChecker::empty()
            .with("account", "alice")
            .with("action", "write")
            .with("time", "2026-10-19T09:00:00Z"),
    );

    println!("\n5. Verifying as alice writing...");
    match write_verifier.verify(&received, secret, &DischargeSet::new()) {
        Ok(()) => println!("   ✗ Unexpectedly granted"),
        Err(e) => println!("   ✓ Access denied: {e}"),
    }

    Ok(())
}
