//! Object store clients and the asset key codec for catalog images.
//!
//! Catalog documents only persist public URLs. This crate owns everything
//! needed to go from bytes to such a URL and back:
//!
//! - [`ObjectStore`]: upload / resolve URL / delete against a blob store
//! - [`AssetKeyCodec`]: the single encoding between [`ObjectPath`]s and URLs
//! - [`FirebaseStorage`]: Firebase Storage over its REST API
//! - [`FileSystemStorage`]: local directory with atomic writes
//!
//! # Example
//!
//! ```rust
//! use catalog_storage::{AssetFolder, FileSystemStorage, ObjectPath, ObjectStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/catalog-media", "http://localhost:8080/o", "uploads")?;
//! let path = ObjectPath::new(AssetFolder::Brands, "brand-1.jpg")?;
//!
//! let object = storage.store(&path, b"jpeg bytes", "image/jpeg").await?;
//! let url = storage.resolve_url(&object).await?;
//!
//! // The URL is all a document keeps; the codec recovers the path for deletion
//! assert_eq!(storage.codec().derive_key(&url)?, path);
//! storage.delete(&path).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod config;
mod filesystem;
mod firebase;
mod folder;
mod path;
mod reference;
mod storage;

pub use catalog_error::{StorageError, StorageErrorKind};
pub use codec::AssetKeyCodec;
pub use config::{
    FileSystemConfig, FirebaseConfig, StorageBackend, StorageConfig, build_store,
};
pub use filesystem::FileSystemStorage;
pub use firebase::FirebaseStorage;
pub use folder::AssetFolder;
pub use path::{MAX_KEY_LEN, ObjectPath, generate_key};
pub use reference::StoredObject;
pub use storage::ObjectStore;
