//! Incoming file buffers.

use std::sync::Arc;

/// Raw bytes of one uploaded file plus the base name its key is built from.
///
/// The stored key is always fresh: `{stem}-{uuid}-{unix-millis}.{ext}`, where
/// `stem` is the name without its extension. Two uploads with the same name
/// never share an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    data: Arc<[u8]>,
    name: String,
}

impl ImageUpload {
    /// Upload `data` with keys derived from `name` (e.g. `brand-b1` or `logo.png`).
    pub fn new(data: impl Into<Arc<[u8]>>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
        }
    }

    /// Raw file bytes.
    pub fn data(&self) -> &Arc<[u8]> {
        &self.data
    }

    /// Base name as supplied.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without a trailing extension; prefix of the generated key.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

/// New files attached to one create/update request, grouped by image field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUploads {
    /// Replacement for the single `image` field
    pub image: Option<ImageUpload>,
    /// Replacement for `imageCover`
    pub image_cover: Option<ImageUpload>,
    /// Replacement gallery, in display order; empty leaves the gallery alone
    pub images: Vec<ImageUpload>,
}

impl ImageUploads {
    /// No new files.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only a single `image`.
    pub fn image(upload: ImageUpload) -> Self {
        Self {
            image: Some(upload),
            ..Self::default()
        }
    }

    /// Set the cover image.
    pub fn with_cover(mut self, upload: ImageUpload) -> Self {
        self.image_cover = Some(upload);
        self
    }

    /// Set the gallery.
    pub fn with_gallery(mut self, uploads: Vec<ImageUpload>) -> Self {
        self.images = uploads;
        self
    }

    /// Whether the request carries no files at all.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.image_cover.is_none() && self.images.is_empty()
    }
}
