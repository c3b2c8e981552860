//! Image transcoding error types.

/// Specific transcoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TranscodeErrorKind {
    /// Input bytes are not a decodable image
    #[display("Failed to decode image: {}", _0)]
    Decode(String),
    /// Canonical encoder rejected the decoded image
    #[display("Failed to encode image: {}", _0)]
    Encode(String),
    /// Decoded image exceeds the configured pixel budget
    #[display("Image resolution exceeds maximum ({}x{})", width, height)]
    ResolutionTooLarge {
        /// Decoded width in pixels
        width: u32,
        /// Decoded height in pixels
        height: u32,
    },
    /// Blocking transcode task did not complete
    #[display("Transcode task failed: {}", _0)]
    Task(String),
}

/// Transcoding error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transcode Error: {} at line {} in {}", kind, line, file)]
pub struct TranscodeError {
    kind: TranscodeErrorKind,
    line: u32,
    file: &'static str,
}

impl TranscodeError {
    /// Create a new transcode error with caller location tracking.
    #[track_caller]
    pub fn new(kind: TranscodeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TranscodeErrorKind {
        &self.kind
    }
}
