use super::*;

#[test]
fn test_keypair_generation() {
    let keypair = Ed25519KeyPair::generate();
    let message = b"Test message";

    let signature = keypair.sign(message);
    assert!(keypair.public_key().verify(message, &signature).is_ok());
}

#[test]
fn test_serialization_roundtrip() {
    let keypair = Ed25519KeyPair::generate();

    let public_bytes = keypair.public_key().to_bytes();
    assert_eq!(public_bytes.len(), 32);

    let public_key = Ed25519PublicKey::from_bytes(&public_bytes).unwrap();
    let reloaded = Ed25519KeyPair::from_seed_bytes(&keypair.seed()).unwrap();
    assert_eq!(public_key, reloaded.public_key());
}

#[test]
fn test_signatures_are_deterministic() {
    let keypair = Ed25519KeyPair::from_seed(&[7u8; 32]);
    let message = b"Test message for persistence";

    let original_sig = keypair.sign(message);
    let reloaded = Ed25519KeyPair::from_seed_bytes(&keypair.seed()).unwrap();
    let new_sig = reloaded.sign(message);

    assert_eq!(original_sig.to_bytes(), new_sig.to_bytes());
    let parsed = Ed25519Signature::from_bytes(&new_sig.to_bytes()).unwrap();
    assert!(keypair.public_key().verify(message, &parsed).is_ok());
}

#[test]
fn test_wrong_signature_fails() {
    let keypair1 = Ed25519KeyPair::from_seed(&[1u8; 32]);
    let keypair2 = Ed25519KeyPair::from_seed(&[2u8; 32]);
    let message = b"Test message";

    let signature = keypair1.sign(message);
    assert!(keypair2.public_key().verify(message, &signature).is_err());
    assert!(keypair1.public_key().verify(b"Other message", &signature).is_err());
}

#[test]
fn test_address_is_twenty_bytes() {
    let keypair = Ed25519KeyPair::from_seed(&[3u8; 32]);
    assert_eq!(keypair.public_key().address().len(), 20);
    assert_ne!(
        keypair.public_key().address(),
        Ed25519KeyPair::from_seed(&[4u8; 32]).public_key().address()
    );
}

#[test]
fn test_malformed_inputs_rejected() {
    assert!(Ed25519PublicKey::from_bytes(&[0u8; 31]).is_err());
    assert!(Ed25519Signature::from_bytes(&[0u8; 10]).is_err());
    assert!(Ed25519KeyPair::from_seed_bytes(&[0u8; 5]).is_err());
}
