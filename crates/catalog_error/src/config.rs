//! Configuration error types.

/// Configuration could not be loaded, parsed, or failed validation.
///
/// `key` names the offending setting (dotted path such as `assets.quality`)
/// when the failure is tied to one.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Configuration Error: {}{} at line {} in {}",
    key.as_deref().map(|key| format!("{}: ", key)).unwrap_or_default(),
    message,
    line,
    file
)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Setting the error refers to, if any
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Failure not tied to a single setting (missing file, syntax error).
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse configuration");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Setting `key` holds an unusable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_error::ConfigError;
    ///
    /// let err = ConfigError::invalid("assets.quality", "must be between 1 and 100");
    /// assert!(err.to_string().contains("assets.quality: must be between 1 and 100"));
    /// ```
    #[track_caller]
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: Some(key.into()),
            line: location.line(),
            file: location.file(),
        }
    }
}
