//! Serialisable records handed to callers.
//!
//! The core never persists these; callers store them wherever they keep
//! ciphertext.

use serde::{Deserialize, Serialize};

/// Ciphertext together with everything needed to decrypt it later.
///
/// `wrapped_key` is the backend-encrypted data key, base64 (standard alphabet).
/// `ciphertext` is the cipher's container text, `base64(nonce || ct || tag)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// Identifier of the master key that wrapped the data key.
    pub key_id: String,
    /// Wrapped data key, base64-encoded.
    pub wrapped_key: String,
    /// Ciphertext container text.
    pub ciphertext: String,
}
