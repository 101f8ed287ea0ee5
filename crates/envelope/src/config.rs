//! Configuration loading and validation for the demo binary.
//!
//! All values are read from environment variables at startup. The process
//! exits with a clear error message if any required variable is missing or
//! invalid.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;

/// Which key provider backs the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyProviderKind {
    /// AWS KMS `GenerateDataKey` / `Decrypt`.
    Kms,
    /// In-memory master key from `LOCAL_MASTER_KEY`.
    Local,
}

/// Validated configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Key provider backend.
    #[serde(default = "default_key_provider")]
    pub key_provider: KeyProviderKind,

    /// Master key identifier (KMS key ID, ARN or alias). **Required.**
    pub kms_key_id: String,

    /// Override for the KMS endpoint (e.g. a local emulator).
    #[serde(default)]
    pub kms_endpoint_url: Option<String>,

    /// Override for the AWS region.
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Base64 master key for the local provider. Required when
    /// `KEY_PROVIDER=local`.
    #[serde(default)]
    pub local_master_key: Option<String>,

    /// Payload the demo round-trips.
    #[serde(default = "default_demo_payload")]
    pub demo_payload: String,

    /// OTLP endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_key_provider() -> KeyProviderKind {
    KeyProviderKind::Kms
}
fn default_demo_payload() -> String {
    "Sensitive Production Data".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    /// Load and validate configuration from an explicit environment source.
    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode `LOCAL_MASTER_KEY` into raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset, not base64, or not 32 bytes.
    pub fn local_master_key_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        let encoded = self
            .local_master_key
            .as_deref()
            .context("LOCAL_MASTER_KEY is required when KEY_PROVIDER=local")?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map(Zeroizing::new)
            .context("LOCAL_MASTER_KEY must be valid base64")?;
        if bytes.len() != KEY_LEN {
            anyhow::bail!(
                "LOCAL_MASTER_KEY must decode to {KEY_LEN} bytes, got {}",
                bytes.len()
            );
        }
        Ok(bytes)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.kms_key_id, "KMS_KEY_ID")?;
        if let Some(url) = &self.kms_endpoint_url {
            ensure_non_empty(url, "KMS_ENDPOINT_URL")?;
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        if self.key_provider == KeyProviderKind::Local {
            self.local_master_key_bytes()?;
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
