//! Catalog image assets.
//!
//! Facade over the workspace crates:
//!
//! - [`catalog_error`]: error kinds and [`CatalogResult`]
//! - [`catalog_storage`]: object stores and the URL key codec
//! - [`catalog_assets`]: transcoding, the asset coordinator and document flows
//!
//! The `catalog` binary exposes upload, delete and key derivation on top of a
//! configured store.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalog::{AssetCoordinator, Brand, CatalogConfig, DocumentRepository, ImageUploads, ImageUpload};
//!
//! # async fn example(repository: &dyn DocumentRepository<Brand>, logo: Vec<u8>) -> catalog::CatalogResult<()> {
//! let coordinator = AssetCoordinator::from_config(&CatalogConfig::load()?)?;
//!
//! let brand = Brand { id: "b1".into(), name: "Acme".into(), slug: "acme".into(), image: None };
//! let uploads = ImageUploads::image(ImageUpload::new(logo, "brand"));
//! let brand = coordinator.create_document(repository, brand, &uploads).await?;
//! println!("{:?}", brand.image);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use telemetry::{default_filter, init_logging};

pub use catalog_assets::{
    AssetCoordinator, AssetsConfig, Brand, CatalogConfig, Category, CleanupReport, DeleteOutcome,
    DocumentRepository, ImageField, ImageOwner, ImageRefs, ImageTranscoder, ImageUpload,
    ImageUploads, Product, SubCategory,
};
pub use catalog_error::{
    CatalogError, CatalogErrorKind, CatalogResult, CleanupError, ConfigError, DocumentError,
    KeyCodecError, StorageError, StorageErrorKind, TranscodeError,
};
pub use catalog_storage::{
    AssetFolder, AssetKeyCodec, FileSystemStorage, FirebaseStorage, ObjectPath, ObjectStore,
    StorageBackend, StorageConfig, StoredObject, build_store,
};
