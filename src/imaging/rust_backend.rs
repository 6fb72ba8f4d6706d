//! Pure Rust image processing backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `ImageReader::with_guessed_format` (magic bytes, not extension) |
//! | Probe | `ImageDecoder::dimensions` + `ImageDecoder::total_bytes` |
//! | Decode (PNG, JPEG, GIF, WebP, BMP, TIFF) | `image` crate decoders, bounded by `image::Limits` |
//! | Resample | `image::imageops::resize` with `Lanczos3` filter |
//! | Composite | `imageops::replace` (transparent canvas) / `imageops::overlay` (matte) |
//! | Encode | `DynamicImage::write_to` into memory, then a single `fs::write` |

use super::backend::{BackendError, ImageBackend, ImageDescriptor, SourceFormat};
use super::params::{Background, OutputFormat, RenderParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Limits, Rgba, RgbaImage};
use log::debug;
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn source_format(format: Option<ImageFormat>) -> SourceFormat {
    match format {
        Some(ImageFormat::Png) => SourceFormat::Png,
        Some(ImageFormat::Jpeg) => SourceFormat::Jpeg,
        Some(ImageFormat::Gif) => SourceFormat::Gif,
        Some(ImageFormat::Ico) => SourceFormat::Ico,
        Some(ImageFormat::WebP) => SourceFormat::WebP,
        Some(ImageFormat::Bmp) => SourceFormat::Bmp,
        Some(ImageFormat::Tiff) => SourceFormat::Tiff,
        _ => SourceFormat::Other,
    }
}

fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpeg => ImageFormat::Jpeg,
        OutputFormat::Gif => ImageFormat::Gif,
        OutputFormat::WebP => ImageFormat::WebP,
    }
}

/// Open a file and sniff its format from the leading bytes.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<std::fs::File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Load and decode an image from disk, refusing allocations above `memory_limit`.
fn load_image(path: &Path, memory_limit: u64) -> Result<DynamicImage, BackendError> {
    let mut reader = open_reader(path)?;
    let mut limits = Limits::default();
    limits.max_alloc = Some(memory_limit);
    reader.limits(limits);
    reader
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Flatten an RGBA canvas onto opaque white for formats without alpha.
fn flatten_onto_white(canvas: &RgbaImage) -> DynamicImage {
    let mut matte = RgbaImage::from_pixel(canvas.width(), canvas.height(), Rgba([255; 4]));
    image::imageops::overlay(&mut matte, canvas, 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(matte).to_rgb8())
}

/// Encode into memory first so a failed encode never leaves a partial file.
fn save_image(canvas: RgbaImage, path: &Path, format: OutputFormat) -> Result<(), BackendError> {
    let image = if format.supports_alpha() {
        DynamicImage::ImageRgba8(canvas)
    } else {
        flatten_onto_white(&canvas)
    };

    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, image_format(format))
        .map_err(|e| BackendError::Encode(format!("{} encode failed: {}", format, e)))?;
    std::fs::write(path, encoded.into_inner())
        .map_err(|e| BackendError::Encode(format!("Failed to write {}: {}", path.display(), e)))
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<ImageDescriptor, BackendError> {
        let reader = open_reader(path)?;
        let format = source_format(reader.format());

        // Icons are rejected by the caller; no need to walk their directory.
        if format == SourceFormat::Ico {
            let (width, height) = reader.into_dimensions().unwrap_or((0, 0));
            return Ok(ImageDescriptor {
                width,
                height,
                format,
                decoded_bytes: 0,
            });
        }

        let decoder = reader
            .into_decoder()
            .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
        let (width, height) = decoder.dimensions();
        let descriptor = ImageDescriptor {
            width,
            height,
            format,
            decoded_bytes: decoder.total_bytes(),
        };
        debug!(
            "probed {}: {}x{} {:?} ({:?}, {} bytes decoded)",
            path.display(),
            width,
            height,
            format,
            decoder.color_type(),
            descriptor.decoded_bytes
        );
        Ok(descriptor)
    }

    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let source = load_image(&params.source, params.memory_limit)?.to_rgba8();
        let layout = &params.layout;

        let placed = if source.dimensions() == (layout.placed_width, layout.placed_height) {
            source
        } else {
            image::imageops::resize(
                &source,
                layout.placed_width,
                layout.placed_height,
                FilterType::Lanczos3,
            )
        };

        let mut canvas = RgbaImage::from_pixel(
            layout.canvas_width,
            layout.canvas_height,
            Rgba(params.background.rgba()),
        );
        match params.background {
            // Copy pixels verbatim, alpha included.
            Background::Transparent => {
                image::imageops::replace(&mut canvas, &placed, layout.offset_x, layout.offset_y)
            }
            Background::Solid(_) => {
                image::imageops::overlay(&mut canvas, &placed, layout.offset_x, layout.offset_y)
            }
        }

        save_image(canvas, &params.output, params.format)
    }
}
