//! Build settings from `kaleidoscope.toml`.
//!
//! Content stays in INI files (`gallery.ini`, `album.ini`); this file only
//! tunes how the build runs. It lives in the gallery root and is optional:
//! without it every default below applies.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # assets_dir = "theme"   # Copy this directory instead of the bundled assets
//!
//! [images]
//! thumb = [300, 200]       # Bounding box of thumbnails
//! large = [1500, 1000]     # Bounding box of large images
//!
//! [resize]
//! backend = "magick"       # "magick" (ImageMagick subprocess) or "builtin"
//! command = "convert"      # ImageMagick executable
//!
//! [processing]
//! max_processes = 1        # Parallel resize workers, clamped to CPU cores
//! ```
//!
//! Unknown keys are rejected so typos fail loudly instead of being ignored.

use crate::assets::AssetSource;
use crate::imaging::{Bound, magick_backend};
use crate::resize::{Bounds, DEFAULT_LARGE_BOUND, DEFAULT_THUMB_BOUND};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "kaleidoscope.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `kaleidoscope.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Replacement for the bundled assets, relative to the gallery root.
    pub assets_dir: Option<PathBuf>,
    /// Bounding boxes of the two variants.
    pub images: ImagesConfig,
    /// Which resize backend to use.
    pub resize: ResizeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, bound) in [("thumb", self.images.thumb), ("large", self.images.large)] {
            if bound.width == 0 || bound.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "images.{name} values must be non-zero"
                )));
            }
        }
        if self.resize.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resize.command must not be empty".into(),
            ));
        }
        if self.processing.max_processes == 0 {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            thumb: self.images.thumb,
            large: self.images.large,
        }
    }

    /// Asset source with `assets_dir` resolved against the gallery root.
    pub fn asset_source(&self, gallery_root: &Path) -> AssetSource {
        match &self.assets_dir {
            Some(dir) => AssetSource::Directory(gallery_root.join(dir)),
            None => AssetSource::Bundled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Thumbnail bounding box as `[width, height]`.
    pub thumb: Bound,
    /// Large image bounding box as `[width, height]`.
    pub large: Bound,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            thumb: DEFAULT_THUMB_BOUND,
            large: DEFAULT_LARGE_BOUND,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// ImageMagick subprocess.
    #[default]
    Magick,
    /// Pure Rust, via the `image` crate.
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub backend: BackendKind,
    /// Executable used by the `magick` backend.
    pub command: String,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Magick,
            command: magick_backend::DEFAULT_COMMAND.to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel resize workers.
    /// Values larger than the core count are clamped down.
    pub max_processes: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { max_processes: 1 }
    }
}

/// Resolve the effective worker count: `min(max_processes, cores)`.
///
/// The user can constrain down, not up.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.clamp(1, cores)
}

/// Load `kaleidoscope.toml` from the gallery root.
///
/// A missing file yields the defaults. A file that exists must parse, must
/// not contain unknown keys, and must validate.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `kaleidoscope.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Kaleidoscope Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the gallery root, next to gallery.ini.
# Unknown keys will cause an error.

# Directory copied to output/assets instead of the bundled stylesheet and
# viewer script. Relative to the gallery root.
# assets_dir = "theme"

# ---------------------------------------------------------------------------
# Image variants
# ---------------------------------------------------------------------------
[images]
# Bounding boxes as [width, height]. Images are shrunk to fit, keeping their
# aspect ratio, and are never enlarged.
thumb = [300, 200]
large = [1500, 1000]

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# "magick" runs ImageMagick for every variant.
# "builtin" resizes in-process and needs no external tools.
backend = "magick"

# ImageMagick executable used by the "magick" backend ("magick" on IM7).
command = "convert"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Parallel resize workers. 1 resizes photos one by one in album order.
# Larger values are clamped to the number of CPU cores.
max_processes = 1
"##
}
