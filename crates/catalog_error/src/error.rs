//! Top-level error wrapper types.

use crate::{
    CleanupError, ConfigError, DocumentError, KeyCodecError, StorageError, TranscodeError,
};

/// Every failure the catalog crates can report.
///
/// # Examples
///
/// ```
/// use catalog_error::{CatalogError, ConfigError};
///
/// let err: CatalogError = ConfigError::new("missing bucket").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CatalogErrorKind {
    /// Input bytes could not be turned into the canonical image format
    #[from(TranscodeError)]
    Transcode(TranscodeError),
    /// Object store failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Reference or path segment rejected by the key codec
    #[from(KeyCodecError)]
    KeyCodec(KeyCodecError),
    /// Post-commit asset removal failure
    #[from(CleanupError)]
    Cleanup(CleanupError),
    /// Document store failure
    #[from(DocumentError)]
    Document(DocumentError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Catalog error with kind discrimination.
///
/// # Examples
///
/// ```
/// use catalog_error::{CatalogResult, StorageError, StorageErrorKind};
///
/// fn remove() -> CatalogResult<()> {
///     Err(StorageError::new(StorageErrorKind::NotFound("uploads/brands/x.jpg".into())))?
/// }
///
/// assert!(remove().unwrap_err().is_not_found());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Catalog Error: {}", _0)]
pub struct CatalogError(Box<CatalogErrorKind>);

impl CatalogError {
    /// Create a new error from a kind.
    pub fn new(kind: CatalogErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CatalogErrorKind {
        &self.0
    }

    /// Whether this is a store-side "object already absent" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), CatalogErrorKind::Storage(e) if e.is_not_found())
    }

    /// Whether this is a "reference not issued by the store" error.
    pub fn is_not_managed(&self) -> bool {
        matches!(self.kind(), CatalogErrorKind::KeyCodec(e) if e.is_not_managed())
    }
}

// Generic From implementation for any type that converts to CatalogErrorKind
impl<T> From<T> for CatalogError
where
    T: Into<CatalogErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
