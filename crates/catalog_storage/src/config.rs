//! Object store configuration and backend construction.

use crate::{FileSystemStorage, FirebaseStorage, ObjectStore};
use catalog_error::{CatalogResult, ConfigError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Which object store implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Firebase Storage over its REST API
    #[display("firebase")]
    Firebase,
    /// Local directory
    #[display("filesystem")]
    FileSystem,
}

/// Firebase Storage settings.
///
/// ```toml
/// [storage.firebase]
/// endpoint = "https://firebasestorage.googleapis.com"
/// bucket = "ecommerce-shop.appspot.com"
/// auth_token = "..."   # optional, usually from CATALOG__STORAGE__FIREBASE__AUTH_TOKEN
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct FirebaseConfig {
    /// REST endpoint
    #[serde(default = "default_endpoint")]
    endpoint: String,
    /// Bucket name
    #[serde(default)]
    bucket: String,
    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

fn default_endpoint() -> String {
    "https://firebasestorage.googleapis.com".to_string()
}

impl FirebaseConfig {
    /// Settings for `bucket` at the default endpoint, without credentials.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            bucket: bucket.into(),
            auth_token: None,
        }
    }
}

/// Local directory settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct FileSystemConfig {
    /// Directory holding the objects
    root: PathBuf,
    /// URL under which `root` is served
    public_base_url: String,
}

impl FileSystemConfig {
    /// Settings for `root` served at `public_base_url`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

/// Object store settings (`[storage]` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct StorageConfig {
    /// Backend to construct
    backend: StorageBackend,
    /// Prefix in front of every object name
    #[serde(default = "default_root_prefix")]
    root_prefix: String,
    /// Per-request timeout for remote stores
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    /// Firebase settings, required when `backend = "firebase"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getter(skip)]
    firebase: Option<FirebaseConfig>,
    /// Filesystem settings, required when `backend = "filesystem"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getter(skip)]
    filesystem: Option<FileSystemConfig>,
}

fn default_root_prefix() -> String {
    "uploads".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl StorageConfig {
    /// Firebase-backed settings with defaults for everything else.
    pub fn firebase(firebase: FirebaseConfig) -> Self {
        Self {
            backend: StorageBackend::Firebase,
            root_prefix: default_root_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
            firebase: Some(firebase),
            filesystem: None,
        }
    }

    /// Filesystem-backed settings with defaults for everything else.
    pub fn filesystem(filesystem: FileSystemConfig) -> Self {
        Self {
            backend: StorageBackend::FileSystem,
            root_prefix: default_root_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
            firebase: None,
            filesystem: Some(filesystem),
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check that the selected backend has usable settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first problem found.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.root_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::invalid("storage.root_prefix", "must not be empty").into());
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("storage.request_timeout_secs", "must be positive").into());
        }

        match self.backend {
            StorageBackend::Firebase => {
                let firebase = self.firebase.as_ref().ok_or_else(|| {
                    ConfigError::invalid("storage.firebase", "required for the firebase backend")
                })?;
                if firebase.bucket.trim().is_empty() {
                    return Err(ConfigError::invalid("storage.firebase.bucket", "must not be empty").into());
                }
            }
            StorageBackend::FileSystem => {
                let filesystem = self.filesystem.as_ref().ok_or_else(|| {
                    ConfigError::invalid("storage.filesystem", "required for the filesystem backend")
                })?;
                if filesystem.public_base_url.trim().is_empty() {
                    return Err(ConfigError::invalid(
                        "storage.filesystem.public_base_url",
                        "must not be empty",
                    )
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// Construct the configured object store.
///
/// Called once at startup; the returned handle is shared by every request.
#[tracing::instrument(skip(config), fields(backend = %config.backend))]
pub fn build_store(config: &StorageConfig) -> CatalogResult<Arc<dyn ObjectStore>> {
    config.validate()?;

    let store: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::Firebase => {
            let firebase = config
                .firebase
                .as_ref()
                .ok_or_else(|| ConfigError::invalid("storage.firebase", "missing"))?;
            Arc::new(FirebaseStorage::new(
                firebase,
                &config.root_prefix,
                config.request_timeout(),
            )?)
        }
        StorageBackend::FileSystem => {
            let filesystem = config
                .filesystem
                .as_ref()
                .ok_or_else(|| ConfigError::invalid("storage.filesystem", "missing"))?;
            Arc::new(FileSystemStorage::new(
                &filesystem.root,
                &filesystem.public_base_url,
                &config.root_prefix,
            )?)
        }
    };

    tracing::info!(backend = store.backend_name(), "Object store ready");
    Ok(store)
}
