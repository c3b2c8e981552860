//! Asset key codec error types.

/// Reasons a reference or path segment was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum KeyCodecErrorKind {
    /// Reference was not issued by the configured store
    #[display("Reference is not store-managed: {}", _0)]
    NotManaged(String),
    /// Folder or key segment is empty, too long or contains forbidden characters
    #[display("Invalid path segment '{}': {}", segment, reason)]
    InvalidSegment {
        /// The offending segment
        segment: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Key codec error with location tracking.
///
/// # Examples
///
/// ```
/// use catalog_error::{KeyCodecError, KeyCodecErrorKind};
///
/// let err = KeyCodecError::new(KeyCodecErrorKind::NotManaged("https://cdn.example.com/a.png".into()));
/// assert!(err.is_not_managed());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Key Codec Error: {} at line {} in {}", kind, line, file)]
pub struct KeyCodecError {
    kind: KeyCodecErrorKind,
    line: u32,
    file: &'static str,
}

impl KeyCodecError {
    /// Create a new key codec error with caller location tracking.
    #[track_caller]
    pub fn new(kind: KeyCodecErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`KeyCodecErrorKind::NotManaged`] error.
    #[track_caller]
    pub fn not_managed(reference: impl Into<String>) -> Self {
        Self::new(KeyCodecErrorKind::NotManaged(reference.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KeyCodecErrorKind {
        &self.kind
    }

    /// Whether the reference simply does not belong to the store.
    pub fn is_not_managed(&self) -> bool {
        matches!(self.kind, KeyCodecErrorKind::NotManaged(_))
    }
}
