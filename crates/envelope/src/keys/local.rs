//! [`LocalKeyProvider`]: in-process key provider for offline runs and tests.
//!
//! Master keys are held in memory by identifier. Data keys come from the OS
//! CSPRNG and are wrapped with the same AES-256-GCM container the payload
//! cipher uses, so a wrapped key is `nonce || ciphertext || tag`.

use std::collections::HashMap;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use async_trait::async_trait;
use common::{CipherError, KeyProviderError};
use tracing::debug;
use zeroize::Zeroizing;

use super::{ensure_key_id, DataKey, DataKeyPair, KeyProvider};
use crate::crypto::{cipher, KEY_LEN};

/// Key provider backed by master keys held in process memory.
#[derive(Debug, Default)]
pub struct LocalKeyProvider {
    master_keys: HashMap<String, DataKey>,
}

impl LocalKeyProvider {
    /// Create a provider with no master keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the master key named `key_id`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyProviderError::InvalidKeyId`] for an empty identifier and
    /// [`KeyProviderError::InvalidKeyMaterial`] if `master_key` is not 32 bytes.
    pub fn with_master_key(
        mut self,
        key_id: impl Into<String>,
        master_key: &[u8],
    ) -> Result<Self, KeyProviderError> {
        let key_id = key_id.into();
        ensure_key_id(&key_id)?;
        self.master_keys
            .insert(key_id, DataKey::from_slice(master_key)?);
        Ok(self)
    }

    fn master_key(&self, key_id: &str) -> Result<&DataKey, KeyProviderError> {
        ensure_key_id(key_id)?;
        self.master_keys
            .get(key_id)
            .ok_or_else(|| KeyProviderError::UnknownKey(key_id.to_owned()))
    }
}

#[async_trait]
impl KeyProvider for LocalKeyProvider {
    async fn generate_data_key(&self, key_id: &str) -> Result<DataKeyPair, KeyProviderError> {
        let master = self.master_key(key_id)?;

        let mut raw = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut raw[..]);
        let plaintext = DataKey::from_slice(&raw[..])?;

        let wrapped = cipher::encrypt_bytes(plaintext.as_bytes(), master.as_bytes())
            .map_err(|e| KeyProviderError::Rejected(e.to_string()))?;

        debug!(key_id, "generated local data key");
        Ok(DataKeyPair { plaintext, wrapped })
    }

    async fn decrypt_data_key(
        &self,
        key_id: &str,
        wrapped: &[u8],
    ) -> Result<DataKey, KeyProviderError> {
        let master = self.master_key(key_id)?;
        if wrapped.is_empty() {
            return Err(KeyProviderError::Rejected("wrapped key is empty".into()));
        }

        let raw = cipher::decrypt_bytes(wrapped, master.as_bytes())
            .map(Zeroizing::new)
            .map_err(|e| match e {
                CipherError::AuthenticationFailure => KeyProviderError::Rejected(
                    "wrapped key does not belong to this master key".into(),
                ),
                other => KeyProviderError::Rejected(other.to_string()),
            })?;
        DataKey::from_slice(&raw)
    }
}
