//! Orphan cleanup error types.

/// Failure modes of post-commit asset removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CleanupErrorKind {
    /// A superseded or removed asset could not be deleted
    #[display("Failed to remove orphaned asset '{}': {}", reference, reason)]
    OrphanCleanup {
        /// Reference (URL) that is now orphaned
        reference: String,
        /// Underlying failure
        reason: String,
    },
}

/// Cleanup error with location tracking.
///
/// Never returned from a lifecycle flow; collected into cleanup reports and logged.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cleanup Error: {} at line {} in {}", kind, line, file)]
pub struct CleanupError {
    kind: CleanupErrorKind,
    line: u32,
    file: &'static str,
}

impl CleanupError {
    /// Create a new cleanup error with caller location tracking.
    #[track_caller]
    pub fn new(kind: CleanupErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CleanupErrorKind {
        &self.kind
    }
}
