//! Handles returned by a successful upload.

use crate::ObjectPath;
use sha2::{Digest, Sha256};

/// An object that is now fully present in the store.
///
/// Hand it to [`ObjectStore::resolve_url`](crate::ObjectStore::resolve_url) to
/// obtain the public reference persisted on documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredObject {
    /// Where the object lives
    pub path: ObjectPath,
    /// MIME type recorded with the object
    pub content_type: String,
    /// Size of the stored bytes
    pub size_bytes: u64,
    /// SHA-256 of the stored bytes (hex)
    pub content_hash: String,
    /// Download token issued by the store, if it uses one
    pub download_token: Option<String>,
}

impl StoredObject {
    /// Describe `data` stored at `path`.
    pub fn describe(
        path: ObjectPath,
        data: &[u8],
        content_type: impl Into<String>,
        download_token: Option<String>,
    ) -> Self {
        Self {
            path,
            content_type: content_type.into(),
            size_bytes: data.len() as u64,
            content_hash: compute_hash(data),
            download_token,
        }
    }
}

/// Compute SHA-256 hash of data.
pub(crate) fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
