//! Verifying gateway payloads before acting on them.
//!
//! Signs a return redirect the way the gateway does, then checks it with
//! [`CallbackVerifier`], once intact and once tampered with.
//!
//! Run with: `cargo run --example callback_verification`

use bluepayment_client::{
    GatewayError,
    config::{ConfigProvider, MemoryConfig},
    hash::{CallbackVerifier, SignedFields},
};

const CONFIG: &str = r#"
[payment.bluepayment]
hash_algorithm = "sha256"
hash_separator = "|"

[payment.bluepayment.pln]
service_id = "100"
shared_key = "example-shared-key"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigProvider::new(MemoryConfig::from_toml(CONFIG)?);
    let credentials = config.credentials("PLN")?;
    let signer = config.signer()?;

    // What the gateway appends to the return URL.
    let redirect = SignedFields::new()
        .with("ServiceID", credentials.service_id.as_str())
        .with("OrderID", "000042")
        .with_hash(&signer, &credentials.shared_key);
    let hash = redirect.hash().map(ToString::to_string).unwrap_or_default();
    println!("Return redirect hash: {hash}");

    let verifier = CallbackVerifier::new(signer);

    let verified = verifier.verify_return(&credentials.service_id, "000042", &hash, &credentials.shared_key)?;
    println!("Verified order: {:?}", verified.get("OrderID"));

    match verifier.verify_return(&credentials.service_id, "000043", &hash, &credentials.shared_key) {
        Err(GatewayError::Verification(reason)) => println!("Tampered redirect rejected: {reason}"),
        Ok(_) => println!("Tampered redirect unexpectedly accepted"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
