//! [`KmsKeyProvider`]: data keys issued and unwrapped by AWS KMS.

use async_trait::async_trait;
use aws_sdk_kms::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::Blob,
    types::DataKeySpec,
};
use common::KeyProviderError;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::AwsClients;
use crate::keys::{ensure_key_id, DataKey, DataKeyPair, KeyProvider};

/// [`KeyProvider`] backed by KMS `GenerateDataKey` / `Decrypt`.
#[derive(Clone, Debug)]
pub struct KmsKeyProvider {
    client: aws_sdk_kms::Client,
}

impl KmsKeyProvider {
    /// Wrap an existing KMS client.
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }

    /// Build from an initialised [`AwsClients`] bundle.
    pub fn from_clients(aws: &AwsClients) -> Self {
        Self::new(aws.kms.clone())
    }
}

#[async_trait]
impl KeyProvider for KmsKeyProvider {
    async fn generate_data_key(&self, key_id: &str) -> Result<DataKeyPair, KeyProviderError> {
        ensure_key_id(key_id)?;

        let mut resp = self
            .client
            .generate_data_key()
            .key_id(key_id)
            .key_spec(DataKeySpec::Aes256)
            .send()
            .await
            .map_err(|e| classify(key_id, e))?;

        let plaintext = resp.plaintext.take().map(|b| Zeroizing::new(b.into_inner()));
        let pair = data_key_pair(
            plaintext.as_deref().map(Vec::as_slice),
            resp.ciphertext_blob().map(|b| b.as_ref()),
        )?;
        debug!(key_id, "KMS data key generated");
        Ok(pair)
    }

    async fn decrypt_data_key(
        &self,
        key_id: &str,
        wrapped: &[u8],
    ) -> Result<DataKey, KeyProviderError> {
        ensure_key_id(key_id)?;
        if wrapped.is_empty() {
            return Err(KeyProviderError::Rejected("wrapped key is empty".into()));
        }

        let mut resp = self
            .client
            .decrypt()
            .key_id(key_id)
            .ciphertext_blob(Blob::new(wrapped))
            .send()
            .await
            .map_err(|e| classify(key_id, e))?;

        let plaintext = resp
            .plaintext
            .take()
            .map(|b| Zeroizing::new(b.into_inner()))
            .ok_or_else(|| {
                KeyProviderError::Rejected("KMS decrypt response contained no plaintext".into())
            })?;
        DataKey::from_slice(&plaintext)
    }
}

/// Validate the two halves of a `GenerateDataKey` response.
fn data_key_pair(
    plaintext: Option<&[u8]>,
    wrapped: Option<&[u8]>,
) -> Result<DataKeyPair, KeyProviderError> {
    let plaintext = plaintext.ok_or_else(|| {
        KeyProviderError::Rejected("KMS response contained no plaintext key".into())
    })?;
    let wrapped = match wrapped {
        Some(w) if !w.is_empty() => w.to_vec(),
        _ => {
            return Err(KeyProviderError::Rejected(
                "KMS response contained no ciphertext blob".into(),
            ))
        }
    };
    Ok(DataKeyPair {
        plaintext: DataKey::from_slice(plaintext)?,
        wrapped,
    })
}

/// Map an SDK failure onto the key provider taxonomy.
fn classify<E, R>(key_id: &str, err: SdkError<E, R>) -> KeyProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let detail = DisplayErrorContext(&err).to_string();
    warn!(key_id, error = %detail, "KMS request failed");
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            KeyProviderError::Unreachable(detail)
        }
        SdkError::ServiceError(ctx) => error_from_code(key_id, ctx.err().code(), detail),
        _ => KeyProviderError::Rejected(detail),
    }
}

fn error_from_code(key_id: &str, code: Option<&str>, detail: String) -> KeyProviderError {
    match code {
        Some("NotFoundException") => KeyProviderError::UnknownKey(key_id.to_owned()),
        Some("DependencyTimeoutException") | Some("KMSInternalException") => {
            KeyProviderError::Unreachable(detail)
        }
        _ => KeyProviderError::Rejected(detail),
    }
}
