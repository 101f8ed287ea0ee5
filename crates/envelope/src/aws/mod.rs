//! AWS SDK client initialisation and the KMS-backed key provider.

pub mod clients;
pub mod kms;

pub use clients::AwsClients;
pub use kms::KmsKeyProvider;
