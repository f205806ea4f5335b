use nis_crypto::{
    decrypt, decrypt_string, encrypt, encrypt_string, generate_random_key, CryptoError,
    EncryptedData, NONCE_SIZE, TAG_SIZE,
};

const AAD: &[u8] = b"com.nis.test.identity";

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = generate_random_key();
    let plaintext = br#"{"device_id":"dev-1","token":"abc"}"#;
    let encrypted = encrypt(&key, plaintext, AAD).unwrap();
    let decrypted = decrypt(&key, &encrypted, AAD).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn encrypt_decrypt_empty() {
    let key = generate_random_key();
    let encrypted = encrypt(&key, b"", AAD).unwrap();
    assert_eq!(encrypted.ciphertext.len(), TAG_SIZE);
    assert_eq!(decrypt(&key, &encrypted, AAD).unwrap(), b"");
}

#[test]
fn wrong_key_fails_decryption() {
    let key1 = generate_random_key();
    let key2 = generate_random_key();
    let encrypted = encrypt(&key1, b"token", AAD).unwrap();
    assert!(matches!(
        decrypt(&key2, &encrypted, AAD),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn value_moved_to_another_key_fails() {
    let key = generate_random_key();
    let encrypted = encrypt(&key, b"token", b"com.nis.a.identity").unwrap();
    assert!(decrypt(&key, &encrypted, b"com.nis.b.identity").is_err());
}

#[test]
fn tampered_data_fails_decryption() {
    let key = generate_random_key();
    let mut encrypted = encrypt(&key, b"Secret", AAD).unwrap();
    encrypted.ciphertext[0] ^= 0xFF;
    assert!(decrypt(&key, &encrypted, AAD).is_err());
}

#[test]
fn same_plaintext_produces_different_ciphertext() {
    let key = generate_random_key();
    let e1 = encrypt(&key, b"Same", AAD).unwrap();
    let e2 = encrypt(&key, b"Same", AAD).unwrap();
    assert_ne!(e1.nonce, e2.nonce);
    assert_ne!(e1.ciphertext, e2.ciphertext);
}

// ── EncryptedData ────────────────────────────────────────────────

#[test]
fn base64_roundtrip_preserves_nonce_and_ciphertext() {
    let key = generate_random_key();
    let encrypted = encrypt(&key, b"payload", AAD).unwrap();
    let decoded = EncryptedData::from_base64(&encrypted.to_base64()).unwrap();
    assert_eq!(decoded.nonce, encrypted.nonce);
    assert_eq!(decoded.ciphertext, encrypted.ciphertext);
    assert_eq!(decoded.len(), NONCE_SIZE + encrypted.ciphertext.len());
}

#[test]
fn from_base64_rejects_short_input() {
    let short = base64_of(&[0u8; NONCE_SIZE + TAG_SIZE - 1]);
    assert!(matches!(
        EncryptedData::from_base64(&short),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn from_base64_rejects_garbage() {
    assert!(EncryptedData::from_base64("not base64!!").is_err());
}

// ── String helpers ───────────────────────────────────────────────

#[test]
fn string_roundtrip() {
    let key = generate_random_key();
    let encoded = encrypt_string(&key, "fcm:token/with+chars", "k").unwrap();
    assert_eq!(decrypt_string(&key, &encoded, "k").unwrap(), "fcm:token/with+chars");
}

#[test]
fn string_decrypt_with_wrong_aad_fails() {
    let key = generate_random_key();
    let encoded = encrypt_string(&key, "value", "k1").unwrap();
    assert!(decrypt_string(&key, &encoded, "k2").is_err());
}

fn base64_of(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.encode(bytes)
}
