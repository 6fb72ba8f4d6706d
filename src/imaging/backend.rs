//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: probe and render. Probing reads only the header, so the caller
//! can reject icon files and oversized images before paying for a full
//! decode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::RenderParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Container format detected from the source file's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
    Ico,
    WebP,
    Bmp,
    Tiff,
    Other,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceFormat::Png => "png",
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Gif => "gif",
            SourceFormat::Ico => "ico",
            SourceFormat::WebP => "webp",
            SourceFormat::Bmp => "bmp",
            SourceFormat::Tiff => "tiff",
            SourceFormat::Other => "other",
        };
        f.write_str(name)
    }
}

/// Result of a probe: what the decoder learned from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: SourceFormat,
    /// Estimated size of the fully decoded pixel buffer, from the decoder's
    /// actual color type (so 16-bit sources count double).
    pub decoded_bytes: u64,
}

/// Trait for image processing backends.
///
/// Every backend must implement both operations so the rest of the codebase
/// is backend-agnostic.
pub trait ImageBackend {
    /// Read dimensions, format and decoded-size estimate without decoding pixels.
    fn probe(&self, path: &Path) -> Result<ImageDescriptor, BackendError>;

    /// Decode the source, composite it onto a fresh canvas as described by
    /// `params.layout`, encode, and write the output file.
    fn render(&self, params: &RenderParams) -> Result<(), BackendError>;
}
