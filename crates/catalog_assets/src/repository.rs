//! Document store collaborator.

use catalog_error::CatalogResult;

/// Durable storage for catalog documents.
///
/// Implemented by the database layer. The lifecycle flows only delete assets
/// after one of these calls has returned `Ok`.
#[async_trait::async_trait]
pub trait DocumentRepository<D>: Send + Sync {
    /// Insert or replace `document`.
    async fn save(&self, document: &D) -> CatalogResult<()>;

    /// Remove the document with `id`, returning it if it existed.
    async fn delete(&self, id: &str) -> CatalogResult<Option<D>>;
}
