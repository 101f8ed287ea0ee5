//! Error taxonomy shared across crates.

use thiserror::Error;

/// Failures reported by a key-management backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyProviderError {
    /// The key identifier was empty.
    #[error("key identifier is required")]
    InvalidKeyId,

    /// The backend does not know the requested key.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// The backend could not be reached (connection failure, timeout).
    #[error("key provider unreachable: {0}")]
    Unreachable(String),

    /// The backend refused the request.
    #[error("key provider rejected request: {0}")]
    Rejected(String),

    /// The backend returned plaintext key material of the wrong length.
    #[error("invalid data key material: expected 32 bytes, got {0}")]
    InvalidKeyMaterial(usize),
}

/// Failures produced by the authenticated cipher.
///
/// Tampering, truncation and wrong-key attempts all collapse into
/// [`CipherError::AuthenticationFailure`] so callers cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The key is not exactly 32 bytes.
    #[error("invalid key size: expected 32 bytes, got {0}")]
    InvalidKeySize(usize),

    /// The ciphertext text is not valid base64.
    #[error("ciphertext is not valid base64")]
    InvalidEncoding,

    /// Tag verification failed.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// The plaintext exceeds the AES-GCM per-message length limit.
    #[error("payload too large to encrypt")]
    PayloadTooLarge,
}

/// Top-level error returned by the secure data handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Data key generation or unwrapping failed.
    #[error(transparent)]
    KeyProvider(#[from] KeyProviderError),

    /// Encryption or decryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The decrypted payload is not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    InvalidPlaintext,
}

impl EnvelopeError {
    /// Short machine-readable code for logs and process output.
    pub fn code(&self) -> &'static str {
        match self {
            EnvelopeError::KeyProvider(_) => "key_provider_error",
            EnvelopeError::Cipher(CipherError::InvalidKeySize(_)) => "invalid_key_size",
            EnvelopeError::Cipher(CipherError::InvalidEncoding) => "invalid_encoding",
            EnvelopeError::Cipher(CipherError::AuthenticationFailure) => "authentication_failure",
            EnvelopeError::Cipher(CipherError::PayloadTooLarge) => "payload_too_large",
            EnvelopeError::InvalidPlaintext => "invalid_plaintext",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(
            EnvelopeError::from(KeyProviderError::InvalidKeyId).code(),
            "key_provider_error"
        );
        assert_eq!(
            EnvelopeError::from(CipherError::InvalidKeySize(16)).code(),
            "invalid_key_size"
        );
        assert_eq!(
            EnvelopeError::from(CipherError::InvalidEncoding).code(),
            "invalid_encoding"
        );
        assert_eq!(
            EnvelopeError::from(CipherError::AuthenticationFailure).code(),
            "authentication_failure"
        );
        assert_eq!(
            EnvelopeError::from(CipherError::PayloadTooLarge).code(),
            "payload_too_large"
        );
        assert_eq!(EnvelopeError::InvalidPlaintext.code(), "invalid_plaintext");
    }

    #[test]
    fn display_is_transparent() {
        let e = EnvelopeError::from(KeyProviderError::UnknownKey("alias/missing".into()));
        assert_eq!(e.to_string(), "unknown key: alias/missing");
    }

    #[test]
    fn key_size_message_includes_length() {
        assert!(CipherError::InvalidKeySize(15).to_string().contains("got 15"));
    }
}
