//! Object store trait definition.

use crate::{AssetKeyCodec, ObjectPath, StoredObject};
use catalog_error::CatalogResult;

/// Remote blob store holding catalog images.
///
/// One instance is built at startup and shared (`Arc<dyn ObjectStore>`) by every
/// in-flight request. Keys are independent: implementations must tolerate
/// concurrent calls for different paths without extra locking.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `data` to `path`.
    ///
    /// Either the object ends up fully present with `data` as content, or the
    /// call fails and nothing is visible at `path`.
    ///
    /// # Errors
    ///
    /// Any [`StorageError`](catalog_error::StorageError) kind; callers treat all
    /// of them as "store unavailable".
    async fn store(
        &self,
        path: &ObjectPath,
        data: &[u8],
        content_type: &str,
    ) -> CatalogResult<StoredObject>;

    /// Public fetch URL for an object returned by [`store`](Self::store).
    async fn resolve_url(&self, object: &StoredObject) -> CatalogResult<String> {
        Ok(self
            .codec()
            .url_for(&object.path, object.download_token.as_deref()))
    }

    /// Remove the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` storage error if nothing exists at `path`; callers
    /// should treat that as already satisfied.
    async fn delete(&self, path: &ObjectPath) -> CatalogResult<()>;

    /// Codec matching the URLs this store issues.
    fn codec(&self) -> &AssetKeyCodec;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
