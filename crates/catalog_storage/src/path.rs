//! Object paths and key construction.

use crate::AssetFolder;
use catalog_error::{KeyCodecError, KeyCodecErrorKind};

/// Longest accepted key, in bytes.
pub const MAX_KEY_LEN: usize = 1024;

/// Location of one asset: `{folder}/{key}` below the store's root prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectPath {
    folder: AssetFolder,
    key: String,
}

impl ObjectPath {
    /// Build a path from a caller-supplied key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyCodecErrorKind::InvalidSegment`] if the key is empty, too long,
    /// or contains anything other than ASCII alphanumerics, `-`, `_` and `.`.
    #[track_caller]
    pub fn new(folder: AssetFolder, key: impl Into<String>) -> Result<Self, KeyCodecError> {
        let key = key.into();
        validate_segment(&key)?;
        Ok(Self { folder, key })
    }

    /// Build a fresh, collision-resistant key: `{prefix}-{uuid}-{unix-millis}.{extension}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_storage::{AssetFolder, ObjectPath};
    ///
    /// let path = ObjectPath::generate(AssetFolder::Brands, "brand", "jpg").unwrap();
    /// assert!(path.key().starts_with("brand-"));
    /// assert!(path.key().ends_with(".jpg"));
    /// ```
    #[track_caller]
    pub fn generate(
        folder: AssetFolder,
        prefix: &str,
        extension: &str,
    ) -> Result<Self, KeyCodecError> {
        Self::new(folder, generate_key(prefix, extension))
    }

    /// Owning folder.
    pub fn folder(&self) -> AssetFolder {
        self.folder
    }

    /// Key within the folder.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.folder, self.key)
    }
}

/// Fresh key of the form `{prefix}-{uuid}-{unix-millis}.{extension}`.
pub fn generate_key(prefix: &str, extension: &str) -> String {
    format!(
        "{}-{}-{}.{}",
        prefix,
        uuid::Uuid::new_v4(),
        chrono::Utc::now().timestamp_millis(),
        extension
    )
}

/// Reject segments that could escape their folder or break the URL encoding.
#[track_caller]
pub(crate) fn validate_segment(segment: &str) -> Result<(), KeyCodecError> {
    let invalid = |reason: &str| {
        KeyCodecError::new(KeyCodecErrorKind::InvalidSegment {
            segment: segment.to_string(),
            reason: reason.to_string(),
        })
    };

    if segment.is_empty() {
        return Err(invalid("segment is empty"));
    }
    if segment.len() > MAX_KEY_LEN {
        return Err(invalid("segment is too long (max 1024)"));
    }
    if segment == "." || segment.contains("..") {
        return Err(invalid("path traversal detected"));
    }
    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(invalid("invalid characters in segment"));
    }

    Ok(())
}
