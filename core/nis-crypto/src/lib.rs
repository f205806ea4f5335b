//! At-rest encryption for SDK credentials.
//!
//! The device id and delivery token are stored encrypted with
//! ChaCha20-Poly1305. Keys are either random (held by an OS credential store)
//! or derived from a host-supplied passphrase with Argon2id.

mod cipher;
mod error;
mod key;

pub use cipher::{
    decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData, NONCE_SIZE, TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, generate_random_key, DerivedKey, KdfParams, Salt, KEY_SIZE, SALT_SIZE};
