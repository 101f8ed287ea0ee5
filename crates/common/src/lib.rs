//! Error taxonomy and protocol records shared across `kms-envelope` crates.

pub mod error;
pub mod protocol;

pub use error::{CipherError, EnvelopeError, KeyProviderError};
pub use protocol::SealedEnvelope;
