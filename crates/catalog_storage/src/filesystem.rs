//! Filesystem-based object store.
//!
//! Stores objects below a local directory using the same object names as the
//! remote store, so references issued in development follow the production
//! URL encoding.

use crate::{AssetKeyCodec, ObjectPath, ObjectStore, StoredObject};
use catalog_error::{CatalogResult, StorageError, StorageErrorKind};
use std::path::PathBuf;
use uuid::Uuid;

/// Filesystem storage backend.
///
/// Layout: `{root}/{root_prefix}/{folder}/{key}`
///
/// ```text
/// /var/catalog/media/
/// └── uploads/
///     ├── brands/
///     │   └── brand-3f2a...-1700000000000.jpg
///     └── products/
///         ├── product-91bc...-cover.jpg
///         └── product-91bc...-1.jpg
/// ```
///
/// Writes go to a uniquely named temp file that is renamed into place, so a
/// reader never observes a partially written object.
pub struct FileSystemStorage {
    root: PathBuf,
    codec: AssetKeyCodec,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the root directory if it doesn't exist. `public_base_url` is the
    /// URL under which the directory is served and becomes the codec's base.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(root, public_base_url))]
    pub fn new(
        root: impl Into<PathBuf>,
        public_base_url: &str,
        root_prefix: &str,
    ) -> CatalogResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), public_base_url, "Created filesystem storage");
        Ok(Self {
            root,
            codec: AssetKeyCodec::new(public_base_url, root_prefix),
        })
    }

    /// Local file holding the object at `path`.
    pub fn file_path(&self, path: &ObjectPath) -> PathBuf {
        self.root
            .join(self.codec.root_prefix())
            .join(path.folder().as_str())
            .join(path.key())
    }
}

#[async_trait::async_trait]
impl ObjectStore for FileSystemStorage {
    #[tracing::instrument(skip(self, data), fields(path = %path, size = data.len()))]
    async fn store(
        &self,
        path: &ObjectPath,
        data: &[u8],
        content_type: &str,
    ) -> CatalogResult<StoredObject> {
        let file = self.file_path(path);

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Temp name is unique per call so concurrent writers never share one
        let temp_path = file.with_file_name(format!(".{}.{}.tmp", path.key(), Uuid::new_v4()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &file).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                file.display(),
                e
            )))
            .into());
        }

        tracing::info!(
            path = %path,
            file = %file.display(),
            size = data.len(),
            content_type,
            "Stored object"
        );

        Ok(StoredObject::describe(path.clone(), data, content_type, None))
    }

    #[tracing::instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &ObjectPath) -> CatalogResult<()> {
        let file = self.file_path(path);

        tokio::fs::remove_file(&file).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    file.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path, file = %file.display(), "Deleted object");
        Ok(())
    }

    fn codec(&self) -> &AssetKeyCodec {
        &self.codec
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
