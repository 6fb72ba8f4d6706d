//! Generator configuration module.
//!
//! Handles loading, validating, and merging `modgen.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged over it key by
//! key, so a config file only needs the values it wants to change.
//!
//! ## Config File Location
//!
//! `modgen.toml` is read from the directory given by `--config` (default: the
//! current directory). A missing file means "all defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! width = 32                 # Target box width (0 = keep source width)
//! height = 32                # Target box height (0 = keep source height)
//! format = "png"             # png, jpeg, gif, webp
//! canvas = "fixed"           # fixed: canvas is the box; scaled: canvas hugs the image
//! background = "transparent" # or an opaque "#rrggbb" matte
//! max_decode_bytes = 536870912
//!
//! [placeholders]
//! "{{module_name}}" = "mymodule"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Background, CanvasMode, DEFAULT_MEMORY_LIMIT, FitRequest, OutputFormat};
use crate::template::Mapping;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up inside the config directory.
pub const CONFIG_FILE: &str = "modgen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `modgen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModgenConfig {
    /// Thumbnail fitting defaults.
    pub images: ImagesConfig,
    /// Placeholder → value pairs applied by `modgen substitute`.
    pub placeholders: Mapping,
}

/// Thumbnail fitting defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Target box width in pixels; 0 keeps the source width.
    pub width: u32,
    /// Target box height in pixels; 0 keeps the source height.
    pub height: u32,
    /// Output encoding.
    pub format: OutputFormat,
    /// Canvas sizing when the source shrinks.
    pub canvas: CanvasMode,
    /// `"transparent"` or `"#rrggbb"`.
    pub background: Background,
    /// Refuse fits whose decoded source, or whose canvas plus resampled
    /// image, would exceed this many bytes.
    pub max_decode_bytes: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            format: OutputFormat::Png,
            canvas: CanvasMode::Fixed,
            background: Background::Transparent,
            max_decode_bytes: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl ModgenConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_decode_bytes == 0 {
            return Err(ConfigError::Validation(
                "images.max_decode_bytes must be non-zero".into(),
            ));
        }
        if self.placeholders.keys().any(|k| k.is_empty()) {
            return Err(ConfigError::Validation(
                "placeholders keys must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The fit request these defaults describe.
    pub fn fit_request(&self) -> FitRequest {
        FitRequest {
            width: self.images.width,
            height: self.images.height,
            format: self.images.format,
            canvas: self.images.canvas,
            background: self.images.background,
            memory_limit: self.images.max_decode_bytes,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ModgenConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `modgen.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ModgenConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ModgenConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `modgen.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ModgenConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `modgen.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# modgen configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Thumbnail fitting (modgen fit)
# ---------------------------------------------------------------------------
[images]
# Target box in pixels. 0 keeps the source dimension on that axis.
# Sources smaller than the box on both axes are never enlarged; they are
# centered on a canvas of the box size instead.
width = 32
height = 32

# Output encoding: png, jpeg, gif or webp.
format = "png"

# Canvas sizing when the source has to shrink:
#   fixed  - the canvas is exactly the box; wide images overflow and are clipped
#   scaled - the canvas width follows the scaled image
canvas = "fixed"

# Canvas fill: "transparent", or an opaque matte such as "#ffffff".
# JPEG has no alpha: transparent pixels become white, a matte is kept as is.
background = "transparent"

# Refuse sources whose decoded pixel data would exceed this many bytes.
# The estimate uses the real bit depth, so 16-bit PNGs count double.
# The output canvas plus the resampled image must also fit under it.
max_decode_bytes = 536870912

# ---------------------------------------------------------------------------
# Placeholders (modgen substitute)
# ---------------------------------------------------------------------------
# Literal text to replace in skeleton files. The longest match wins and
# replaced text is never rescanned.
[placeholders]
# "{{module_name}}" = "mymodule"
# "{{ModuleClass}}" = "MyModule"
"##
}
