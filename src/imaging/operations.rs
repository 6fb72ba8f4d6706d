//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They validate
//! the source, compute the layout, and call the backend.
//!
//! ## Failure kinds
//!
//! | Check (in order) | Error |
//! |---|---|
//! | Source missing or empty | [`FitError::InvalidInput`] |
//! | Header unreadable | [`FitError::DecodeFailure`] |
//! | Icon file | [`FitError::UnsupportedFormat`] (fatal) |
//! | Zero width or height | [`FitError::DecodeFailure`] |
//! | Decoded size over the ceiling | [`FitError::MemoryLimitExceeded`] |
//! | Canvas plus resampled image over the ceiling | [`FitError::MemoryLimitExceeded`] |
//! | Pixel decode fails | [`FitError::DecodeFailure`] |
//! | Encode or write fails | [`FitError::EncodeFailure`] |
//!
//! Nothing is written to the destination unless every check passes.

use super::backend::{BackendError, ImageBackend, ImageDescriptor, SourceFormat};
use super::calculations::calculate_fit;
use super::params::{FitRequest, FitResult, RenderParams};
use super::rust_backend::RustBackend;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("Invalid input: {} is missing or empty", .0.display())]
    InvalidInput(PathBuf),
    #[error("Unsupported format: {} is an icon file, not a valid image", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Failed to decode {}: {detail}", path.display())]
    DecodeFailure { path: PathBuf, detail: String },
    #[error(
        "Memory limit exceeded: {} needs {needed} bytes in memory, limit is {limit}",
        path.display()
    )]
    MemoryLimitExceeded {
        path: PathBuf,
        needed: u64,
        limit: u64,
    },
    #[error("Failed to write {}: {detail}", path.display())]
    EncodeFailure { path: PathBuf, detail: String },
}

impl FitError {
    /// Whether this failure must abort the enclosing operation instead of
    /// being reported as a skipped image.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FitError::UnsupportedFormat(_))
    }
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, FitError>;

/// Check that a source exists and has content.
fn ensure_source(source: &Path) -> Result<()> {
    match std::fs::metadata(source) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(FitError::InvalidInput(source.to_path_buf())),
    }
}

/// Probe the source and apply every check that does not need pixels.
pub fn inspect_source(
    backend: &impl ImageBackend,
    source: &Path,
    memory_limit: u64,
) -> Result<ImageDescriptor> {
    ensure_source(source)?;

    let descriptor = backend
        .probe(source)
        .map_err(|e| FitError::DecodeFailure {
            path: source.to_path_buf(),
            detail: e.to_string(),
        })?;

    if descriptor.format == SourceFormat::Ico {
        warn!("rejecting icon file {}", source.display());
        return Err(FitError::UnsupportedFormat(source.to_path_buf()));
    }
    if descriptor.width == 0 || descriptor.height == 0 {
        return Err(FitError::DecodeFailure {
            path: source.to_path_buf(),
            detail: format!(
                "reported dimensions {}x{}",
                descriptor.width, descriptor.height
            ),
        });
    }
    if descriptor.decoded_bytes > memory_limit {
        warn!(
            "{} needs {} bytes decoded, over the {} byte limit",
            source.display(),
            descriptor.decoded_bytes,
            memory_limit
        );
        return Err(FitError::MemoryLimitExceeded {
            path: source.to_path_buf(),
            needed: descriptor.decoded_bytes,
            limit: memory_limit,
        });
    }

    Ok(descriptor)
}

/// Bytes the render allocates for the RGBA canvas and the resampled source.
///
/// `None` when the total does not fit in a `u64`.
fn render_bytes(layout: &FitResult) -> Option<u64> {
    let rgba = |w: u32, h: u32| u64::from(w).checked_mul(u64::from(h))?.checked_mul(4);
    rgba(layout.canvas_width, layout.canvas_height)?
        .checked_add(rgba(layout.placed_width, layout.placed_height)?)
}

/// Refuse layouts whose output buffers would exceed `memory_limit`.
fn check_render_budget(source: &Path, layout: &FitResult, memory_limit: u64) -> Result<()> {
    match render_bytes(layout) {
        Some(needed) if needed <= memory_limit => Ok(()),
        needed => {
            let needed = needed.unwrap_or(u64::MAX);
            warn!(
                "{}: a {}x{} canvas needs {} bytes, over the {} byte limit",
                source.display(),
                layout.canvas_width,
                layout.canvas_height,
                needed,
                memory_limit
            );
            Err(FitError::MemoryLimitExceeded {
                path: source.to_path_buf(),
                needed,
                limit: memory_limit,
            })
        }
    }
}

/// Plan a fit without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_fit(
    descriptor: &ImageDescriptor,
    source: &Path,
    destination: &Path,
    request: &FitRequest,
) -> RenderParams {
    let layout = calculate_fit(
        (descriptor.width, descriptor.height),
        (request.width, request.height),
        request.canvas,
    );

    RenderParams {
        source: source.to_path_buf(),
        output: destination.to_path_buf(),
        layout,
        format: request.format,
        background: request.background,
        memory_limit: request.memory_limit,
    }
}

/// Fit `source` into the requested box and write it to `destination`.
///
/// Returns the layout that was rendered.
pub fn fit_image(
    backend: &impl ImageBackend,
    source: &Path,
    destination: &Path,
    request: &FitRequest,
) -> Result<FitResult> {
    let descriptor = inspect_source(backend, source, request.memory_limit)?;
    let params = plan_fit(&descriptor, source, destination, request);
    check_render_budget(source, &params.layout, request.memory_limit)?;
    debug!(
        "fitting {} ({}x{}) into {}x{} canvas as {}x{} at ({}, {})",
        source.display(),
        descriptor.width,
        descriptor.height,
        params.layout.canvas_width,
        params.layout.canvas_height,
        params.layout.placed_width,
        params.layout.placed_height,
        params.layout.offset_x,
        params.layout.offset_y
    );

    backend.render(&params).map_err(|e| match e {
        BackendError::Encode(detail) => FitError::EncodeFailure {
            path: destination.to_path_buf(),
            detail,
        },
        other => FitError::DecodeFailure {
            path: source.to_path_buf(),
            detail: other.to_string(),
        },
    })?;

    Ok(params.layout)
}

/// [`fit_image`] with the production [`RustBackend`].
pub fn fit(source: &Path, destination: &Path, request: &FitRequest) -> Result<FitResult> {
    fit_image(&RustBackend::new(), source, destination, request)
}
