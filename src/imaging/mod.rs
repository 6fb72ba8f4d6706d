//! Image fitting in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::ImageReader` + `ImageDecoder::total_bytes` |
//! | **Layout** | [`calculate_fit`] (upscale guard, height-keyed shrink, centering) |
//! | **Render** | Lanczos3 resample onto a transparent or matte canvas |
//! | **Encode** | PNG (default), JPEG, GIF, WebP |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for layout math (unit testable)
//! - **Parameters**: Data structures describing a fit
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Source validation + layout + backend execution

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, ImageDescriptor, SourceFormat};
pub use calculations::{calculate_fit, center_offset, resolve_target};
pub use operations::{FitError, fit, fit_image, inspect_source, plan_fit};
pub use params::{
    Background, CanvasMode, DEFAULT_MEMORY_LIMIT, FitRequest, FitResult, OutputFormat,
    RenderParams,
};
pub use rust_backend::RustBackend;
