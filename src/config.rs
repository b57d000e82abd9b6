//! Tool configuration module.
//!
//! Handles loading and validating `picshelf.toml`. Every field has a stock
//! default; user config files are sparse and override just the values they
//! want. Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [upload]
//! max_file_bytes = 10485760       # Upload ceiling (10 MiB)
//! allowed_types = ["image/jpeg", "image/png", "image/webp", "image/gif"]
//!
//! [optimizer]
//! max_width = 1920                # Output never exceeds these bounds
//! max_height = 1080
//! quality = 85                    # JPEG quality (1-100); WebP is lossless
//! format = "jpeg"                 # jpeg | png | webp
//!
//! [thumbnails]
//! size = 150                      # Square side length in pixels
//! quality = 80
//!
//! [gallery]
//! max_images = 10                 # Slot budget per gallery
//!
//! [store]
//! root = ".picshelf-store"        # Directory backing the object store
//! base_url = "file://picshelf"    # URL prefix for stored objects
//!
//! [processing]
//! max_processes = 4               # Max parallel workers (omit for auto = CPU cores)
//! ```

use crate::imaging::{OptimizeParams, OutputFormat, Quality, ThumbnailParams};
use crate::validate::{ALLOWED_TYPES, DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `picshelf.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShelfConfig {
    /// Upload acceptance policy (size ceiling, allowed MIME types).
    pub upload: UploadSection,
    /// Optimizer bounds, quality, and output format.
    pub optimizer: OptimizerSection,
    /// Thumbnail generation settings.
    pub thumbnails: ThumbnailsSection,
    /// Gallery slot budget.
    pub gallery: GallerySection,
    /// Object store location.
    pub store: StoreSection,
    /// Parallel processing settings.
    pub processing: ProcessingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadSection {
    pub max_file_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerSection {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u32,
    pub format: OutputFormat,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: 85,
            format: OutputFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsSection {
    pub size: u32,
    pub quality: u32,
}

impl Default for ThumbnailsSection {
    fn default() -> Self {
        Self {
            size: 150,
            quality: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySection {
    pub max_images: usize,
}

impl Default for GallerySection {
    fn default() -> Self {
        Self { max_images: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// Directory backing the filesystem object store.
    pub root: String,
    /// URL prefix returned for stored objects.
    pub base_url: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            root: ".picshelf-store".to_string(),
            base_url: "file://picshelf".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingSection {
    /// Max parallel workers. `None` = one per CPU core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

impl ShelfConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ShelfConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the given file, or `picshelf.toml` in the working directory if it
    /// exists, or stock defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new("picshelf.toml");
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.optimizer.max_width == 0 || self.optimizer.max_height == 0 {
            return Err(ConfigError::Validation(
                "optimizer.max_width and max_height must be at least 1".to_string(),
            ));
        }
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be at least 1".to_string(),
            ));
        }
        if self.gallery.max_images == 0 {
            return Err(ConfigError::Validation(
                "gallery.max_images must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_bytes: self.upload.max_file_bytes,
            allowed_types: self.upload.allowed_types.clone(),
        }
    }

    pub fn optimize_params(&self) -> OptimizeParams {
        OptimizeParams {
            max_width: self.optimizer.max_width,
            max_height: self.optimizer.max_height,
            quality: Quality::new(self.optimizer.quality),
            format: self.optimizer.format,
        }
    }

    pub fn thumbnail_params(&self) -> ThumbnailParams {
        ThumbnailParams {
            size: self.thumbnails.size,
            quality: Quality::new(self.thumbnails.quality),
        }
    }
}

/// Worker count for the rayon pool: user setting capped at CPU cores.
/// Users can constrain down, not up.
pub fn effective_threads(processing: &ProcessingSection) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match processing.max_processes {
        Some(n) if n >= 1 => n.min(cores),
        _ => cores,
    }
}

/// The stock config with every option documented, for `picshelf gen-config`.
pub fn stock_config_toml() -> String {
    let header = "\
# picshelf configuration
# All options are optional - the values below are the stock defaults.
# Unknown keys are rejected.

";
    let body = toml::to_string_pretty(&ShelfConfig::default())
        .unwrap_or_else(|_| String::new());
    format!("{header}{body}")
}
