//! `envelope-demo` binary: round-trips a sample payload through the handler.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the tracing subscriber (and OTLP export if configured).
//! 3. Build the configured key provider (AWS KMS or local).
//! 4. Run `SecureDataHandler::handle` and print the recovered payload.

use anyhow::Result;
use tracing::{error, info};

use envelope::aws::{AwsClients, KmsKeyProvider};
use envelope::config::{Config, KeyProviderKind};
use envelope::{telemetry, KeyProvider, LocalKeyProvider, SecureDataHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = ?cfg.key_provider,
        "envelope-demo starting"
    );

    // -----------------------------------------------------------------------
    // 3. Key provider + 4. round trip
    // -----------------------------------------------------------------------
    let result = match cfg.key_provider {
        KeyProviderKind::Kms => {
            let aws =
                AwsClients::init(cfg.aws_region.as_deref(), cfg.kms_endpoint_url.as_deref()).await;
            run(KmsKeyProvider::from_clients(&aws), &cfg).await
        }
        KeyProviderKind::Local => match local_provider(&cfg) {
            Ok(provider) => run(provider, &cfg).await,
            Err(e) => {
                error!(error = %e, "local key provider setup failed");
                Err(e)
            }
        },
    };

    // Runs on every path so buffered spans are flushed before exit.

    telemetry::shutdown_telemetry();
    result
}

fn local_provider(cfg: &Config) -> Result<LocalKeyProvider> {
    let master = cfg.local_master_key_bytes()?;
    Ok(LocalKeyProvider::new().with_master_key(cfg.kms_key_id.clone(), &master)?)
}

async fn run<P: KeyProvider>(provider: P, cfg: &Config) -> Result<()> {
    let handler = SecureDataHandler::new(provider);
    match handler
        .handle(&cfg.kms_key_id, cfg.demo_payload.as_bytes())
        .await
    {
        Ok(decrypted) => {
            println!("Decrypted Data: {decrypted}");
            Ok(())
        }
        Err(e) => {
            error!(code = e.code(), error = %e, "secure data round trip failed");
            Err(e.into())
        }
    }
}
