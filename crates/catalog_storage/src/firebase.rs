//! Firebase Storage backend.
//!
//! Talks to the Firebase Storage REST API:
//!
//! - upload: `POST {endpoint}/v0/b/{bucket}/o?uploadType=media&name={object name}`
//! - delete: `DELETE {endpoint}/v0/b/{bucket}/o/{encoded object name}`
//!
//! Download URLs carry the `downloadTokens` value returned by the upload.

use crate::{AssetKeyCodec, FirebaseConfig, ObjectPath, ObjectStore, StoredObject};
use catalog_error::{CatalogResult, ConfigError, StorageError, StorageErrorKind};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Upload response fields we rely on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

/// Firebase Storage client.
///
/// Holds one pooled [`reqwest::Client`]; clone-free sharing happens through
/// `Arc<dyn ObjectStore>`.
pub struct FirebaseStorage {
    client: Client,
    auth_token: Option<String>,
    codec: AssetKeyCodec,
}

impl FirebaseStorage {
    /// Create a client for the configured bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bucket is empty or the HTTP client cannot be built.
    #[tracing::instrument(skip(config), fields(bucket = %config.bucket()))]
    pub fn new(
        config: &FirebaseConfig,
        root_prefix: &str,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        if config.bucket().trim().is_empty() {
            return Err(ConfigError::invalid("storage.firebase.bucket", "must not be empty").into());
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            auth_token: config.auth_token().clone(),
            codec: AssetKeyCodec::firebase(config.endpoint(), config.bucket(), root_prefix),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }
}

/// Translate a non-success status into a storage error.
fn status_error(status: StatusCode, object_name: &str) -> StorageError {
    match status {
        StatusCode::NOT_FOUND => {
            StorageError::new(StorageErrorKind::NotFound(object_name.to_string()))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::error!(object_name, %status, "Access denied by Firebase Storage");
            StorageError::new(StorageErrorKind::PermissionDenied(format!(
                "{} for {}",
                status, object_name
            )))
        }
        status => {
            tracing::error!(object_name, %status, "Unexpected response from Firebase Storage");
            StorageError::new(StorageErrorKind::Unavailable(format!(
                "unexpected status {} for {}",
                status, object_name
            )))
        }
    }
}

fn transport_error(error: reqwest::Error) -> StorageError {
    StorageError::new(StorageErrorKind::Unavailable(error.to_string()))
}

/// First token of Firebase's comma-separated `downloadTokens` value.
fn first_token(tokens: Option<String>) -> Option<String> {
    tokens.and_then(|t| {
        t.split(',')
            .map(str::trim)
            .find(|token| !token.is_empty())
            .map(str::to_string)
    })
}

#[async_trait::async_trait]
impl ObjectStore for FirebaseStorage {
    #[tracing::instrument(skip(self, data), fields(path = %path, size = data.len()))]
    async fn store(
        &self,
        path: &ObjectPath,
        data: &[u8],
        content_type: &str,
    ) -> CatalogResult<StoredObject> {
        let object_name = self.codec.object_name(path);

        let request = self
            .client
            .post(self.codec.base_url())
            .query(&[("uploadType", "media"), ("name", object_name.as_str())])
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec());

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // A missing bucket on upload is an outage, not an absent object
            let error = match status_error(status, &object_name) {
                e if e.is_not_found() => StorageError::new(StorageErrorKind::Unavailable(
                    format!("bucket not found while uploading {}", object_name),
                )),
                e => e,
            };
            return Err(error.into());
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidResponse(format!(
                "upload of {}: {}",
                object_name, e
            )))
        })?;

        if body.name != object_name {
            return Err(StorageError::new(StorageErrorKind::InvalidResponse(format!(
                "uploaded {} but store reported {}",
                object_name, body.name
            )))
            .into());
        }

        tracing::info!(
            path = %path,
            size = data.len(),
            content_type,
            "Stored object in Firebase Storage"
        );

        Ok(StoredObject::describe(
            path.clone(),
            data,
            content_type,
            first_token(body.download_tokens),
        ))
    }

    #[tracing::instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &ObjectPath) -> CatalogResult<()> {
        let url = format!("{}/{}", self.codec.base_url(), self.codec.encoded_name(path));

        let response = self
            .authorize(self.client.delete(&url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, &self.codec.object_name(path)).into());
        }

        tracing::info!(path = %path, "Deleted object from Firebase Storage");
        Ok(())
    }

    fn codec(&self) -> &AssetKeyCodec {
        &self.codec
    }

    fn backend_name(&self) -> &'static str {
        "firebase"
    }
}
