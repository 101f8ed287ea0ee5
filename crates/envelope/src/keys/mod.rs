//! Data key generation and unwrapping.
//!
//! # Lifecycle
//!
//! 1. The handler asks a [`KeyProvider`] for a fresh [`DataKeyPair`] per call.
//! 2. The plaintext half lives only in memory inside a [`DataKey`], which
//!    zeroes itself on drop.
//! 3. The wrapped half is handed back to the caller for storage next to the
//!    ciphertext; it is never inspected here.
//!
//! # Security invariants
//!
//! - Plaintext key material is **never** logged, cached or persisted.
//! - Providers reject an empty key identifier without contacting a backend.

pub mod data_key;
pub mod local;

pub use data_key::{DataKey, DataKeyPair};
pub use local::LocalKeyProvider;

use async_trait::async_trait;
use common::KeyProviderError;

/// Capability to issue and unwrap data keys.
///
/// Implemented by the AWS KMS backend and by [`LocalKeyProvider`]; the
/// handler depends only on this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Generate a fresh 32-byte data key under the master key `key_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyProviderError`] if `key_id` is empty or unknown, or the
    /// backend is unreachable or refuses the request.
    async fn generate_data_key(&self, key_id: &str) -> Result<DataKeyPair, KeyProviderError>;

    /// Recover the plaintext data key from its wrapped form.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`KeyProvider::generate_data_key`].
    async fn decrypt_data_key(
        &self,
        key_id: &str,
        wrapped: &[u8],
    ) -> Result<DataKey, KeyProviderError>;
}

/// Reject empty identifiers before any backend call.
pub(crate) fn ensure_key_id(key_id: &str) -> Result<(), KeyProviderError> {
    if key_id.trim().is_empty() {
        return Err(KeyProviderError::InvalidKeyId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_ids_rejected() {
        assert_eq!(ensure_key_id(""), Err(KeyProviderError::InvalidKeyId));
        assert_eq!(ensure_key_id("   "), Err(KeyProviderError::InvalidKeyId));
        assert!(ensure_key_id("mock-key-id").is_ok());
    }
}
