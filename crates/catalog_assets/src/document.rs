//! Catalog documents and their image fields.

use catalog_storage::AssetFolder;
use serde::{Deserialize, Serialize};

/// Image-bearing field of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageField {
    /// Single `image`
    Image,
    /// Product `imageCover`
    ImageCover,
    /// Product gallery `images`
    Images,
}

impl ImageField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageField::Image => "image",
            ImageField::ImageCover => "imageCover",
            ImageField::Images => "images",
        }
    }
}

/// Snapshot of the image references held by one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRefs {
    /// Single `image`
    pub image: Option<String>,
    /// Product cover
    pub image_cover: Option<String>,
    /// Product gallery, in display order
    pub images: Vec<String>,
}

impl ImageRefs {
    /// Every reference, single image first, then cover, then gallery.
    pub fn all(&self) -> Vec<String> {
        self.image
            .iter()
            .chain(self.image_cover.iter())
            .chain(self.images.iter())
            .filter(|reference| !reference.is_empty())
            .cloned()
            .collect()
    }

    /// Whether no field holds a reference.
    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}

/// A document that owns image assets.
pub trait ImageOwner: Send + Sync {
    /// Store folder for this document type's assets.
    const FOLDER: AssetFolder;
    /// Document type name for messages.
    const KIND: &'static str;
    /// Image fields this type has.
    const FIELDS: &'static [ImageField];

    /// Document identifier.
    fn id(&self) -> &str;

    /// Current references.
    fn image_refs(&self) -> ImageRefs;

    /// Overwrite the references of every field this type has.
    fn set_image_refs(&mut self, refs: ImageRefs);

    /// Whether this type has `field`.
    fn has_field(field: ImageField) -> bool {
        Self::FIELDS.contains(&field)
    }
}

/// Product brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Logo reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Top-level category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Category child. Owns no images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Parent category id
    pub category: String,
}

/// Sellable product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// URL slug
    pub slug: String,
    /// Cover image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_cover: Option<String>,
    /// Gallery references, in display order
    #[serde(default)]
    pub images: Vec<String>,
}

impl ImageOwner for Brand {
    const FOLDER: AssetFolder = AssetFolder::Brands;
    const KIND: &'static str = "brand";
    const FIELDS: &'static [ImageField] = &[ImageField::Image];

    fn id(&self) -> &str {
        &self.id
    }

    fn image_refs(&self) -> ImageRefs {
        ImageRefs {
            image: self.image.clone(),
            ..ImageRefs::default()
        }
    }

    fn set_image_refs(&mut self, refs: ImageRefs) {
        self.image = refs.image;
    }
}

impl ImageOwner for Category {
    const FOLDER: AssetFolder = AssetFolder::Categories;
    const KIND: &'static str = "category";
    const FIELDS: &'static [ImageField] = &[ImageField::Image];

    fn id(&self) -> &str {
        &self.id
    }

    fn image_refs(&self) -> ImageRefs {
        ImageRefs {
            image: self.image.clone(),
            ..ImageRefs::default()
        }
    }

    fn set_image_refs(&mut self, refs: ImageRefs) {
        self.image = refs.image;
    }
}

impl ImageOwner for Product {
    const FOLDER: AssetFolder = AssetFolder::Products;
    const KIND: &'static str = "product";
    const FIELDS: &'static [ImageField] = &[ImageField::ImageCover, ImageField::Images];

    fn id(&self) -> &str {
        &self.id
    }

    fn image_refs(&self) -> ImageRefs {
        ImageRefs {
            image: None,
            image_cover: self.image_cover.clone(),
            images: self.images.clone(),
        }
    }

    fn set_image_refs(&mut self, refs: ImageRefs) {
        self.image_cover = refs.image_cover;
        self.images = refs.images;
    }
}
