//! Handle configuration module.
//!
//! Loads the defaults applied to newly opened handles from an optional
//! `bitmap-handle.toml`. Every key is optional; a missing file yields the
//! stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! access = "read-write"     # read | write | read-write
//! bpp = 32                  # 8, 16, 24, 32, 48, 64, 96 or 128
//! width = 640               # Size of newly allocated images
//! height = 480
//! clear_color = "#ffffff"   # Used by clear operations
//! format = "png"            # Fallback when the path has no known extension
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::flags::ImageFlags;
use crate::handle::OpenOptions;
use crate::imaging::{Color, Format, SUPPORTED_DEPTHS};
use serde::{Deserialize, Serialize};
use std::fs;
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

/// Access mode written in config files, mapped onto [`ImageFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl Access {
    pub fn flags(self) -> ImageFlags {
        match self {
            Access::Read => ImageFlags::READ,
            Access::Write => ImageFlags::WRITE,
            Access::ReadWrite => ImageFlags::READ | ImageFlags::WRITE,
        }
    }
}

/// Defaults for new handles, loaded from `bitmap-handle.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandleConfig {
    pub access: Access,
    /// Bits per pixel of newly allocated images.
    pub bpp: u32,
    pub width: u32,
    pub height: u32,
    pub clear_color: Color,
    /// Used when a path's extension does not name a format.
    pub format: Format,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            access: Access::default(),
            bpp: 32,
            width: 640,
            height: 480,
            clear_color: Color::WHITE,
            format: Format::Png,
        }
    }
}

impl HandleConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_DEPTHS.contains(&self.bpp) {
            return Err(ConfigError::Validation(format!(
                "bpp must be one of {SUPPORTED_DEPTHS:?}, got {}",
                self.bpp
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Validation(
                "width and height must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Options for [`Image::open`](crate::handle::Image::open) built from this config.
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions::new()
            .flags(self.access.flags())
            .size(self.width, self.height)
            .bpp(self.bpp)
            .clear_color(self.clear_color)
    }

    /// Format for `path`: its extension if known, the configured fallback otherwise.
    pub fn format_for(&self, path: &Path) -> Format {
        Format::from_path(path).unwrap_or(self.format)
    }
}

/// Load and validate the config file at `path`.
///
/// Returns the stock defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<HandleConfig, ConfigError> {
    if !path.exists() {
        return Ok(HandleConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: HandleConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `bitmap-handle.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bitmap-handle configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Access mode for opened images: "read", "write" or "read-write".
# "read" loads the file; "write" allows drawing and saving and allocates
# a blank image when nothing was loaded.
access = "read-write"

# Bits per pixel of newly allocated images.
# One of 8, 16, 24, 32, 48, 64, 96, 128.
bpp = 32

# Size of newly allocated images, in pixels.
width = 640
height = 480

# Color used by the clear operations, as #rrggbb or #rrggbbaa.
clear_color = "#ffffff"

# Format used when the file extension does not name one.
# One of: png, jpeg, bmp, tiff, webp, gif, tga.
format = "png"
"##
}
