//! Document collaborator error types.

/// Failures reported by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DocumentErrorKind {
    /// No document exists with the given id
    #[display("No document for this id {}", _0)]
    NotFound(String),
    /// Document could not be written or removed
    #[display("Failed to persist document: {}", _0)]
    Persist(String),
    /// Upload targets an image field this document type does not have
    #[display("{} documents have no '{}' image field", document, field)]
    UnsupportedField {
        /// Document type
        document: String,
        /// Requested field
        field: String,
    },
}

/// Document error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Document Error: {} at line {} in {}", kind, line, file)]
pub struct DocumentError {
    kind: DocumentErrorKind,
    line: u32,
    file: &'static str,
}

impl DocumentError {
    /// Create a new document error with caller location tracking.
    #[track_caller]
    pub fn new(kind: DocumentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DocumentErrorKind {
        &self.kind
    }
}
