//! Image asset lifecycle for catalog documents.
//!
//! Brands, categories and products keep only public URLs of their images. This
//! crate turns uploaded bytes into those URLs and retires the objects behind
//! URLs a document stops referencing.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`ImageTranscoder`] | Decode any supported input, re-encode to the canonical format |
//! | [`AssetCoordinator`] | Upload single/cover/gallery images, delete by reference, replace |
//! | [`ImageOwner`] | Documents with image fields ([`Brand`], [`Category`], [`Product`]) |
//! | [`DocumentRepository`] | Durable document writes the flows commit through |
//! | [`CatalogConfig`] | Layered configuration for the store and the transcoder |
//!
//! Superseded assets are deleted only after the document write that drops them
//! has succeeded. Cleanup failures are reported in a [`CleanupReport`] and never
//! fail the request.
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_assets::{AssetCoordinator, CatalogConfig, ImageUpload};
//! use catalog_storage::AssetFolder;
//!
//! # async fn example(bytes: Vec<u8>) -> catalog_error::CatalogResult<()> {
//! let coordinator = AssetCoordinator::from_config(&CatalogConfig::load()?)?;
//!
//! let upload = ImageUpload::new(bytes, "brand");
//! let url = coordinator.upload_single(AssetFolder::Brands, &upload).await?;
//!
//! let report = coordinator.cleanup(AssetFolder::Brands, &[url]).await;
//! assert!(report.is_clean());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coordinator;
mod document;
mod lifecycle;
mod repository;
pub mod transcode;
mod upload;

pub use config::{AssetsConfig, CatalogConfig};
pub use coordinator::{AssetCoordinator, CleanupReport, DeleteOutcome};
pub use document::{Brand, Category, ImageField, ImageOwner, ImageRefs, Product, SubCategory};
pub use repository::DocumentRepository;
pub use transcode::ImageTranscoder;
pub use upload::{ImageUpload, ImageUploads};
