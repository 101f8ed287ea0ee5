//! AES-256-GCM payload encryption primitives.
//!
//! This module is free of AWS dependencies. It provides the encrypt/decrypt
//! operations used by the handler and by the local key provider.
//!
//! # Ciphertext format
//!
//! ```text
//! base64( nonce (12 bytes) || ciphertext || tag (16 bytes) )
//! ```
//!
//! Standard base64 alphabet with padding. The layout is fixed so that other
//! processes and languages can decrypt what this crate produces.

pub mod cipher;

pub use cipher::{AesGcmCipher, Cipher, KEY_LEN};
