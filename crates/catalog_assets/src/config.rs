//! Catalog configuration.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Bundled defaults (include_str! from catalog.toml)
//! 2. `~/.config/catalog/catalog.toml`
//! 3. `./catalog.toml`
//! 4. An explicit file passed to [`CatalogConfig::load_with`]
//! 5. Environment variables prefixed `CATALOG__`, e.g.
//!    `CATALOG__STORAGE__FIREBASE__AUTH_TOKEN`

use crate::{AssetCoordinator, ImageTranscoder, transcode};
use catalog_error::{CatalogError, CatalogResult, ConfigError};
use catalog_storage::{StorageConfig, build_store};
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Image processing and fan-out settings (`[assets]` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct AssetsConfig {
    /// Lossy encoder quality, 1-100
    #[serde(default = "default_quality")]
    quality: u8,
    /// Largest accepted input, in pixels
    #[serde(default = "default_max_pixels")]
    max_pixels: u64,
    /// Gallery files processed at once
    #[serde(default = "default_concurrency")]
    gallery_concurrency: usize,
    /// Deletions in flight during cleanup
    #[serde(default = "default_concurrency")]
    cleanup_concurrency: usize,
}

fn default_quality() -> u8 {
    transcode::DEFAULT_QUALITY
}

fn default_max_pixels() -> u64 {
    transcode::DEFAULT_MAX_PIXELS
}

fn default_concurrency() -> usize {
    4
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            quality: default_quality(),
            max_pixels: default_max_pixels(),
            gallery_concurrency: default_concurrency(),
            cleanup_concurrency: default_concurrency(),
        }
    }
}

impl AssetsConfig {
    /// Transcoder for these settings.
    pub fn transcoder(&self) -> ImageTranscoder {
        ImageTranscoder::new(self.quality, self.max_pixels)
    }

    /// Check value ranges.
    pub fn validate(&self) -> CatalogResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::invalid("assets.quality", "must be between 1 and 100").into());
        }
        if self.max_pixels == 0 {
            return Err(ConfigError::invalid("assets.max_pixels", "must be positive").into());
        }
        if self.gallery_concurrency == 0 {
            return Err(ConfigError::invalid("assets.gallery_concurrency", "must be positive").into());
        }
        if self.cleanup_concurrency == 0 {
            return Err(ConfigError::invalid("assets.cleanup_concurrency", "must be positive").into());
        }
        Ok(())
    }
}

/// Complete catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CatalogConfig {
    /// Object store settings
    storage: StorageConfig,
    /// Image settings
    #[serde(default)]
    assets: AssetsConfig,
}

fn build_error(e: config::ConfigError) -> CatalogError {
    ConfigError::new(format!("Failed to build configuration: {}", e)).into()
}

fn parse_error(e: config::ConfigError) -> CatalogError {
    ConfigError::new(format!("Failed to parse configuration: {}", e)).into()
}

impl CatalogConfig {
    /// Assemble a configuration from its parts.
    pub fn new(storage: StorageConfig, assets: AssetsConfig) -> Self {
        Self { storage, assets }
    }

    /// Load configuration from a single TOML file, without defaults.
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration from file");

        Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(build_error)?
            .try_deserialize()
            .map_err(parse_error)
    }

    /// Load configuration with the standard precedence.
    pub fn load() -> CatalogResult<Self> {
        Self::load_with(None)
    }

    /// Load configuration with the standard precedence plus an optional
    /// explicit file above the current-directory one.
    #[instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load_with(explicit: Option<&Path>) -> CatalogResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../catalog.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/catalog/catalog.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("catalog").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CATALOG")
                .prefix_separator("__")
                .separator("__"),
        );

        let config: Self = builder
            .build()
            .map_err(build_error)?
            .try_deserialize()
            .map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> CatalogResult<()> {
        self.storage.validate()?;
        self.assets.validate()
    }
}

impl AssetCoordinator {
    /// Build the store and a coordinator around it.
    ///
    /// Called once at startup.
    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        let store = build_store(config.storage())?;
        Ok(Self::with_config(store, config.assets()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_defaults() {
        let config = AssetsConfig::default();
        assert_eq!(*config.quality(), 40);
        assert_eq!(*config.gallery_concurrency(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_assets_rejects_out_of_range() {
        assert!(AssetsConfig::default().with_quality(0).validate().is_err());
        assert!(AssetsConfig::default().with_quality(101).validate().is_err());
        assert!(AssetsConfig::default()
            .with_cleanup_concurrency(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_bundled_defaults_parse() {
        let config: CatalogConfig = Config::builder()
            .add_source(File::from_str(
                include_str!("../../../catalog.toml"),
                FileFormat::Toml,
            ))
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");

        assert!(config.validate().is_ok());
        assert_eq!(config.storage().root_prefix(), "uploads");
        assert_eq!(*config.assets().quality(), 40);
    }
}
