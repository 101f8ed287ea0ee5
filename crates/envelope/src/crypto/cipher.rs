//! AES-256-GCM encryption and decryption of whole payloads.
//!
//! **Every call draws a fresh 96-bit nonce from the OS CSPRNG.** GCM nonce
//! reuse under one key breaks both confidentiality and authentication, so
//! there is no API that accepts a caller-chosen nonce.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CipherError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of a GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Injectable encrypt/decrypt strategy used by the secure data handler.
#[cfg_attr(test, mockall::automock)]
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` under `key`, returning the base64 container text.
    fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> Result<String, CipherError>;

    /// Decrypt container text produced by [`Cipher::encrypt`].
    fn decrypt(&self, ciphertext: &str, key: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// Production [`Cipher`] backed by the free functions in this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmCipher;

impl Cipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> Result<String, CipherError> {
        encrypt(plaintext, key)
    }

    fn decrypt(&self, ciphertext: &str, key: &[u8]) -> Result<Vec<u8>, CipherError> {
        decrypt(ciphertext, key)
    }
}

/// Encrypt `plaintext` and return `base64(nonce || ciphertext || tag)`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeySize`] if `key` is not [`KEY_LEN`] bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<String, CipherError> {
    let container = encrypt_bytes(plaintext, key)?;
    Ok(STANDARD.encode(container))
}

/// Decrypt base64 container text back to plaintext bytes.
///
/// # Errors
///
/// - [`CipherError::InvalidKeySize`] if `key` is not [`KEY_LEN`] bytes.
/// - [`CipherError::InvalidEncoding`] if `ciphertext` is not valid base64.
/// - [`CipherError::AuthenticationFailure`] on truncation, tampering or a wrong key.
pub fn decrypt(ciphertext: &str, key: &[u8]) -> Result<Vec<u8>, CipherError> {
    ensure_key_len(key)?;
    let container = STANDARD
        .decode(ciphertext)
        .map_err(|_| CipherError::InvalidEncoding)?;
    decrypt_bytes(&container, key)
}

/// Encrypt `plaintext` and return the raw `nonce || ciphertext || tag` bytes.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeySize`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::PayloadTooLarge`] if the AEAD refuses the input,
/// which only happens beyond the GCM message length limit.
pub fn encrypt_bytes(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CipherError::PayloadTooLarge)?;

    let mut container = Vec::with_capacity(NONCE_LEN + sealed.len());
    container.extend_from_slice(&nonce_bytes);
    container.extend_from_slice(&sealed);
    Ok(container)
}

/// Decrypt raw `nonce || ciphertext || tag` bytes.
///
/// # Errors
///
/// - [`CipherError::InvalidKeySize`] if `key` is not [`KEY_LEN`] bytes.
/// - [`CipherError::AuthenticationFailure`] on truncation, tampering or a wrong key.
pub fn decrypt_bytes(container: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    if container.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::AuthenticationFailure);
    }
    let (nonce, sealed) = container.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CipherError::AuthenticationFailure)
}

fn ensure_key_len(key: &[u8]) -> Result<(), CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeySize(key.len()));
    }
    Ok(())
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CipherError> {
    ensure_key_len(key)?;
    Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKeySize(key.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn random_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = random_key();
        let text = encrypt(b"Sensitive Info", &key).unwrap();
        assert_eq!(decrypt(&text, &key).unwrap(), b"Sensitive Info");
    }

    #[test]
    fn empty_payload_round_trip() {
        let key = random_key();
        let text = encrypt(b"", &key).unwrap();
        assert!(decrypt(&text, &key).unwrap().is_empty());
    }

    #[test]
    fn binary_payload_round_trip() {
        let key = random_key();
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let text = encrypt(&payload, &key).unwrap();
        assert_eq!(decrypt(&text, &key).unwrap(), payload);
    }

    #[test]
    fn container_layout() {
        let key = random_key();
        let container = encrypt_bytes(b"hello", &key).unwrap();
        assert_eq!(container.len(), NONCE_LEN + 5 + TAG_LEN);

        let text = encrypt(b"hello", &key).unwrap();
        assert_eq!(STANDARD.decode(&text).unwrap().len(), NONCE_LEN + 5 + TAG_LEN);
    }

    #[test]
    fn decrypts_known_answer_container() {
        // AES-256-GCM, zero key, zero nonce, 16 zero bytes of plaintext.
        let key = [0u8; KEY_LEN];
        let mut container = vec![0u8; NONCE_LEN];
        container.extend(hex("cea7403d4d606b6e074ec5d3baf39d18"));
        container.extend(hex("d0d1c8a799996bf0265b98b5d48ab919"));

        let text = STANDARD.encode(&container);
        assert_eq!(decrypt(&text, &key).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn nonce_is_never_zero_or_repeated() {
        let key = random_key();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let container = encrypt_bytes(b"same payload", &key).unwrap();
            let nonce = container[..NONCE_LEN].to_vec();
            assert_ne!(nonce, vec![0u8; NONCE_LEN]);
            assert!(seen.insert(nonce), "nonce reused");
        }
    }

    #[test]
    fn same_payload_encrypts_differently() {
        let key = random_key();
        let a = encrypt(b"same", &key).unwrap();
        let b = encrypt(b"same", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn every_bit_flip_fails_auth() {
        let key = random_key();
        let container = encrypt_bytes(b"Sensitive Info", &key).unwrap();
        for byte in 0..container.len() {
            for bit in 0..8 {
                let mut tampered = container.clone();
                tampered[byte] ^= 1 << bit;
                let text = STANDARD.encode(&tampered);
                assert_eq!(
                    decrypt(&text, &key),
                    Err(CipherError::AuthenticationFailure),
                    "flip at byte {byte} bit {bit} was accepted"
                );
            }
        }
    }

    #[test]
    fn wrong_key_fails_auth() {
        let k1 = random_key();
        let k2 = random_key();
        let text = encrypt(b"secret", &k1).unwrap();
        assert_eq!(decrypt(&text, &k2), Err(CipherError::AuthenticationFailure));
    }

    #[test]
    fn invalid_key_size_rejected() {
        let good = encrypt(b"x", &random_key()).unwrap();
        for len in [0usize, 1, 15, 16, 24, 31, 33, 64] {
            let key = vec![0u8; len];
            assert_eq!(encrypt(b"x", &key), Err(CipherError::InvalidKeySize(len)));
            assert_eq!(decrypt(&good, &key), Err(CipherError::InvalidKeySize(len)));
        }
    }

    #[test]
    fn bad_base64_rejected() {
        let key = random_key();
        assert_eq!(
            decrypt("invalidciphertext!", &key),
            Err(CipherError::InvalidEncoding)
        );
    }

    #[test]
    fn truncated_container_fails_auth() {
        let key = random_key();
        let container = encrypt_bytes(b"payload", &key).unwrap();
        for len in [0, NONCE_LEN, NONCE_LEN + TAG_LEN - 1, container.len() - 1] {
            let text = STANDARD.encode(&container[..len]);
            assert_eq!(decrypt(&text, &key), Err(CipherError::AuthenticationFailure));
        }
    }

    #[test]
    fn trait_impl_delegates() {
        let key = random_key();
        let cipher = AesGcmCipher;
        let text = cipher.encrypt(b"via trait", &key).unwrap();
        assert_eq!(cipher.decrypt(&text, &key).unwrap(), b"via trait");
    }
}
