//! Error types for the catalog image asset backend.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The families line up with the asset lifecycle:
//!
//! | family | raised by | fatal to the request? |
//! |---|---|---|
//! | [`TranscodeError`] | image transcoder | yes |
//! | [`StorageError`] | object store (`NotFound` on delete is treated as success) | yes, before commit |
//! | [`KeyCodecError`] | key codec (`NotManaged` refs are skipped) | no |
//! | [`CleanupError`] | post-commit orphan removal | never |
//! | [`DocumentError`] | document store collaborator | yes |
//! | [`ConfigError`] | configuration loading | yes |
//!
//! # Examples
//!
//! ```
//! use catalog_error::{CatalogResult, ConfigError};
//!
//! fn load() -> CatalogResult<String> {
//!     Err(ConfigError::new("bucket is empty"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cleanup;
mod codec;
mod config;
mod document;
mod error;
mod storage;
mod transcode;

pub use cleanup::{CleanupError, CleanupErrorKind};
pub use codec::{KeyCodecError, KeyCodecErrorKind};
pub use config::ConfigError;
pub use document::{DocumentError, DocumentErrorKind};
pub use error::{CatalogError, CatalogErrorKind, CatalogResult};
pub use storage::{StorageError, StorageErrorKind};
pub use transcode::{TranscodeError, TranscodeErrorKind};
