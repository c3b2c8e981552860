//! Logical asset namespaces.

use serde::{Deserialize, Serialize};

/// Folder under which one entity type's assets are grouped in the store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AssetFolder {
    /// Brand logos
    #[display("brands")]
    Brands,
    /// Category images
    #[display("categories")]
    Categories,
    /// Product cover and gallery images
    #[display("products")]
    Products,
}

impl AssetFolder {
    /// Path segment used inside object names.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFolder::Brands => "brands",
            AssetFolder::Categories => "categories",
            AssetFolder::Products => "products",
        }
    }

    /// Singular entity name used to prefix generated keys.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AssetFolder::Brands => "brand",
            AssetFolder::Categories => "category",
            AssetFolder::Products => "product",
        }
    }
}

impl std::str::FromStr for AssetFolder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brands" => Ok(AssetFolder::Brands),
            "categories" => Ok(AssetFolder::Categories),
            "products" => Ok(AssetFolder::Products),
            _ => Err(format!("Unknown asset folder: {}", s)),
        }
    }
}
