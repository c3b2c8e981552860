//! Asset key codec.
//!
//! Converts between [`ObjectPath`]s and the public URLs the store hands out.
//! Every backend builds its URLs with [`AssetKeyCodec::url_for`] and every
//! deletion resolves them with [`AssetKeyCodec::derive_key`], so the two
//! directions cannot drift apart.
//!
//! # Encoding (object-segment v1)
//!
//! ```text
//! {base_url}/{percent-encode("{root_prefix}/{folder}/{key}")}?alt=media[&token={token}]
//! ```
//!
//! `base_url` is backend specific (`{endpoint}/v0/b/{bucket}/o` for Firebase,
//! the configured public URL for the filesystem backend). The object name is
//! exactly one path segment; `/` inside it is always `%2F`.

use crate::{AssetFolder, ObjectPath};
use catalog_error::KeyCodecError;
use tracing::debug;

/// Bidirectional mapping between object paths and public URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetKeyCodec {
    base_url: String,
    root_prefix: String,
}

impl AssetKeyCodec {
    /// Create a codec for URLs rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, root_prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            root_prefix: root_prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Create a codec for Firebase Storage download URLs.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_storage::AssetKeyCodec;
    ///
    /// let codec = AssetKeyCodec::firebase("https://firebasestorage.googleapis.com", "shop.appspot.com", "uploads");
    /// assert_eq!(codec.base_url(), "https://firebasestorage.googleapis.com/v0/b/shop.appspot.com/o");
    /// ```
    pub fn firebase(endpoint: &str, bucket: &str, root_prefix: impl Into<String>) -> Self {
        Self::new(
            format!("{}/v0/b/{}/o", endpoint.trim_end_matches('/'), bucket),
            root_prefix,
        )
    }

    /// URL prefix shared by every managed reference.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prefix placed before the folder in every object name.
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Full object name inside the bucket: `{root_prefix}/{folder}/{key}`.
    pub fn object_name(&self, path: &ObjectPath) -> String {
        format!("{}/{}/{}", self.root_prefix, path.folder(), path.key())
    }

    /// Object name as a single percent-encoded URL segment.
    pub fn encoded_name(&self, path: &ObjectPath) -> String {
        urlencoding::encode(&self.object_name(path)).into_owned()
    }

    /// Public fetch URL for an object.
    pub fn url_for(&self, path: &ObjectPath, token: Option<&str>) -> String {
        let mut url = format!("{}/{}?alt=media", self.base_url, self.encoded_name(path));
        if let Some(token) = token {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    /// Recover the `(folder, key)` pair a managed URL was built from.
    ///
    /// Query strings and fragments are ignored.
    ///
    /// # Errors
    ///
    /// Returns a `NotManaged` error for any URL this codec could not have
    /// produced: a different host or bucket, extra path segments, a different
    /// root prefix, an unknown folder, or an invalid key.
    pub fn derive_key(&self, url: &str) -> Result<ObjectPath, KeyCodecError> {
        let not_managed = || KeyCodecError::not_managed(url);

        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let without_query = without_fragment
            .split_once('?')
            .map_or(without_fragment, |(head, _)| head);

        let segment = without_query
            .strip_prefix(self.base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(not_managed)?;
        if segment.is_empty() || segment.contains('/') {
            return Err(not_managed());
        }

        let decoded = urlencoding::decode(segment).map_err(|_| not_managed())?;
        let (folder, key) = decoded
            .strip_prefix(self.root_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(not_managed)?;

        let folder: AssetFolder = folder.parse().map_err(|_| not_managed())?;
        let path = ObjectPath::new(folder, key).map_err(|_| not_managed())?;

        debug!(url, path = %path, "Derived object path from reference");
        Ok(path)
    }
}
