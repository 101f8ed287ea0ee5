//! [`SecureDataHandler`]: key provider → cipher orchestration.
//!
//! Every operation asks the provider for key material, runs the cipher, and
//! returns. Failures at any stage abort the operation and surface unchanged;
//! there is no retry and no fallback.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{CipherError, EnvelopeError, SealedEnvelope};
use tracing::{debug, instrument};

use crate::crypto::{AesGcmCipher, Cipher};
use crate::keys::KeyProvider;

/// Orchestrates data key generation, encryption and decryption.
///
/// Both collaborators are injected at construction, so tests can substitute
/// either one without touching global state.
#[derive(Debug, Clone)]
pub struct SecureDataHandler<P, C = AesGcmCipher> {
    provider: P,
    cipher: C,
}

impl<P: KeyProvider> SecureDataHandler<P> {
    /// Create a handler using the production AES-256-GCM cipher.
    pub fn new(provider: P) -> Self {
        Self::with_cipher(provider, AesGcmCipher)
    }
}

impl<P: KeyProvider, C: Cipher> SecureDataHandler<P, C> {
    /// Create a handler with an explicit cipher strategy.
    pub fn with_cipher(provider: P, cipher: C) -> Self {
        Self { provider, cipher }
    }

    /// Encrypt `data` under a fresh data key and decrypt it again.
    ///
    /// Returns the recovered plaintext. Useful to validate a key and payload
    /// end to end before anything is stored.
    ///
    /// # Errors
    ///
    /// Propagates provider and cipher failures unchanged. Returns
    /// [`EnvelopeError::InvalidPlaintext`] if the recovered bytes are not UTF-8.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn handle(&self, key_id: &str, data: &[u8]) -> Result<String, EnvelopeError> {
        let pair = self.provider.generate_data_key(key_id).await?;
        let key = pair.plaintext.as_bytes();

        let ciphertext = self.cipher.encrypt(data, key)?;
        let plaintext = self.cipher.decrypt(&ciphertext, key)?;

        debug!("round trip complete");
        String::from_utf8(plaintext).map_err(|_| EnvelopeError::InvalidPlaintext)
    }

    /// Encrypt `data` under a fresh data key for storage.
    ///
    /// The returned envelope carries the wrapped key; the plaintext key is
    /// dropped before this returns.
    ///
    /// # Errors
    ///
    /// Propagates provider and cipher failures unchanged.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn seal(&self, key_id: &str, data: &[u8]) -> Result<SealedEnvelope, EnvelopeError> {
        let pair = self.provider.generate_data_key(key_id).await?;
        let ciphertext = self.cipher.encrypt(data, pair.plaintext.as_bytes())?;

        Ok(SealedEnvelope {
            key_id: key_id.to_owned(),
            wrapped_key: STANDARD.encode(&pair.wrapped),
            ciphertext,
        })
    }

    /// Unwrap the envelope's data key via the provider and decrypt its payload.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidEncoding`] if the wrapped key is not
    /// base64; otherwise propagates provider and cipher failures unchanged.
    #[instrument(skip(self, envelope), fields(key_id = %envelope.key_id))]
    pub async fn open(&self, envelope: &SealedEnvelope) -> Result<Vec<u8>, EnvelopeError> {
        let wrapped = STANDARD
            .decode(&envelope.wrapped_key)
            .map_err(|_| CipherError::InvalidEncoding)?;
        let key = self
            .provider
            .decrypt_data_key(&envelope.key_id, &wrapped)
            .await?;

        Ok(self.cipher.decrypt(&envelope.ciphertext, key.as_bytes())?)
    }
}
