//! AWS SDK client bundle.

use aws_config::{BehaviorVersion, Region};

/// AWS SDK clients used by the KMS key provider.
#[derive(Clone, Debug)]
pub struct AwsClients {
    /// KMS client used to generate and decrypt data keys.
    pub kms: aws_sdk_kms::Client,
}

impl AwsClients {
    /// Initialise the SDK clients from the standard AWS configuration chain.
    ///
    /// `region` overrides the region resolved from the environment/profile.
    /// `kms_endpoint_url` points the KMS client at a non-default endpoint
    /// (e.g. a local KMS emulator).
    pub async fn init(region: Option<&str>, kms_endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_owned()));
        }
        let config = loader.load().await;

        let mut kms_config = aws_sdk_kms::config::Builder::from(&config);
        if let Some(url) = kms_endpoint_url {
            kms_config = kms_config.endpoint_url(url);
        }
        let kms = aws_sdk_kms::Client::from_conf(kms_config.build());

        Self { kms }
    }
}
