//! Envelope encryption: per-operation data keys from a key provider, payloads
//! sealed with AES-256-GCM.
//!
//! ```text
//! KeyProvider::generate_data_key ──► Cipher::encrypt ──► Cipher::decrypt
//!        (KMS / local)                (nonce || ct || tag, base64)
//! ```

pub mod aws;
pub mod config;
pub mod crypto;
pub mod handler;
pub mod keys;
pub mod telemetry;

pub use handler::SecureDataHandler;
pub use keys::{DataKey, DataKeyPair, KeyProvider, LocalKeyProvider};
