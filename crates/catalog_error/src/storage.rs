//! Object store error types.

/// Kinds of object store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Store could not be reached or refused the request (network, quota, 5xx)
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
    /// Credentials were missing or rejected
    #[display("Permission denied: {}", _0)]
    PermissionDenied(String),
    /// Object not found at the specified path
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// Store answered with a body we could not interpret
    #[display("Invalid store response: {}", _0)]
    InvalidResponse(String),
    /// Failed to create a local storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an object to local storage
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read an object from local storage
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
}

/// Object store error with location tracking.
///
/// # Examples
///
/// ```
/// use catalog_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("uploads/brands/a.jpg".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorageErrorKind {
        &self.kind
    }

    /// Whether the target object was already absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StorageErrorKind::NotFound(_))
    }
}
