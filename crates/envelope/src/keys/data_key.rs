//! [`DataKey`]: in-memory plaintext data key material.

use common::KeyProviderError;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Produced once per operation by a key provider and dropped when the
/// operation returns. On drop the memory is overwritten with zeroes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DataKey(Box<[u8; KEY_LEN]>);

impl DataKey {
    /// Copy `bytes` into a new key buffer.
    ///
    /// # Errors
    ///
    /// Returns [`KeyProviderError::InvalidKeyMaterial`] if `bytes` is not
    /// [`KEY_LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyProviderError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyProviderError::InvalidKeyMaterial(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("DataKey([REDACTED])")
    }
}

/// A freshly generated data key and its backend-wrapped form.
#[derive(Debug)]
pub struct DataKeyPair {
    /// Plaintext key, used immediately and then dropped.
    pub plaintext: DataKey,
    /// Opaque wrapped key; only the issuing backend can unwrap it.
    pub wrapped: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_length() {
        let key = DataKey::from_slice(&[0x42u8; KEY_LEN]).unwrap();
        assert_eq!(key.as_bytes(), &[0x42u8; KEY_LEN][..]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            DataKey::from_slice(&[0u8; 16]).unwrap_err(),
            KeyProviderError::InvalidKeyMaterial(16)
        );
    }

    #[test]
    fn zeroize_clears_key_material() {
        fn wiped_on_drop<T: ZeroizeOnDrop>() {}
        wiped_on_drop::<DataKey>();

        let mut key = DataKey::from_slice(&[0xABu8; KEY_LEN]).unwrap();
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN][..]);
    }

    #[test]
    fn redacted_in_debug() {
        let pair = DataKeyPair {
            plaintext: DataKey::from_slice(&[0xFFu8; KEY_LEN]).unwrap(),
            wrapped: b"wrapped".to_vec(),
        };
        let printed = format!("{pair:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("255"));
    }
}
