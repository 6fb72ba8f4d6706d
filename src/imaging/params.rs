//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which validates the source and computes the layout) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`OutputFormat`]: Encoding for the written canvas (PNG by default).
//! - [`CanvasMode`]: Whether the canvas keeps the requested width or shrinks to the placed image.
//! - [`Background`]: Canvas fill: fully transparent, or an opaque matte color.
//! - [`FitRequest`]: Everything a caller decides before a fit: box, format, canvas mode, fill, memory ceiling.
//! - [`FitResult`]: The computed layout: canvas size, placed size, offsets.
//! - [`RenderParams`]: Everything one backend render call needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default decode ceiling: 512 MiB of decoded pixel data.
pub const DEFAULT_MEMORY_LIMIT: u64 = 512 * 1024 * 1024;

/// Encoding used for the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// Canonical file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
        }
    }

    /// Whether the encoded file can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            "webp" => Ok(OutputFormat::WebP),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How the canvas width is chosen when the source has to shrink.
///
/// - `Fixed`: the canvas is exactly the requested box; the placed image is
///   centered inside it and may overflow horizontally.
/// - `Scaled`: the canvas width follows the aspect-locked width of the placed
///   image, so the output hugs the image.
///
/// When the upscale guard applies the canvas is always the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasMode {
    #[default]
    Fixed,
    Scaled,
}

impl FromStr for CanvasMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(CanvasMode::Fixed),
            "scaled" => Ok(CanvasMode::Scaled),
            other => Err(format!("unknown canvas mode: {other} (expected fixed or scaled)")),
        }
    }
}

/// Fill applied to the canvas before the scaled image is placed.
///
/// Serialized as its string form (`"transparent"` or `"#rrggbb"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    /// Fully transparent white. Flattens to white for formats without alpha.
    #[default]
    Transparent,
    /// Opaque matte color.
    Solid([u8; 3]),
}

impl Background {
    /// RGBA value used to fill the canvas.
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Background::Transparent => [255, 255, 255, 0],
            Background::Solid([r, g, b]) => [r, g, b, 255],
        }
    }
}

impl FromStr for Background {
    type Err = String;

    /// Accepts `transparent` or a `#rrggbb` hex color.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Background::Transparent);
        }
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("invalid background: {s} (expected transparent or #rrggbb)"))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("invalid background: {s} (bad hex digit)"))
        };
        Ok(Background::Solid([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Background {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        background.to_string()
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Transparent => f.write_str("transparent"),
            Background::Solid([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// A fit requested by a caller.
///
/// A `width` or `height` of 0 means "keep the source dimension on that axis".
#[derive(Debug, Clone, PartialEq)]
pub struct FitRequest {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub canvas: CanvasMode,
    pub background: Background,
    /// Ceiling for the estimated decoded size of the source, in bytes.
    pub memory_limit: u64,
}

impl Default for FitRequest {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            format: OutputFormat::Png,
            canvas: CanvasMode::Fixed,
            background: Background::Transparent,
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

/// Computed layout of a fit: how the scaled source sits on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub placed_width: u32,
    pub placed_height: u32,
    /// Horizontal offset of the placed image; negative when it overflows.
    pub offset_x: i64,
    pub offset_y: i64,
    /// True when the request would have enlarged both axes and the source
    /// was placed at its original size instead.
    pub upscale_guarded: bool,
}

/// Parameters for a single render: decode, composite, encode, write.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub layout: FitResult,
    pub format: OutputFormat,
    pub background: Background,
    pub memory_limit: u64,
}
