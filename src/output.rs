//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Fit
//!
//! ```text
//! logo.png → views/img/logo.png
//!     Placed: 43x32 at (-5, 0)
//!     Canvas: 32x32 png, transparent
//! ```
//!
//! Sources smaller than the box add `    Upscale guard: kept source size`.
//!
//! ## Copy / Delete / Zip
//!
//! ```text
//! skeleton/ → build/mymodule/
//!     5 directories, 4 files, 1.2 KiB
//!
//! Deleted build/mymodule
//!
//! build/mymodule/ → mymodule.zip
//!     5 directories, 4 files
//! ```
//!
//! ## Substitute
//!
//! ```text
//! 3 replacements  build/mymodule/mymodule.php
//! unchanged       build/mymodule/upgrade/readme.txt
//!
//! 4 replacements in 1 of 2 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::archive::ArchiveSummary;
use crate::imaging::{FitRequest, FitResult};
use crate::tree::TreeStats;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Human-readable byte count in binary units.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Directory paths get a trailing slash in headers.
fn dir_label(path: &Path) -> String {
    let s = path.display().to_string();
    if s.ends_with('/') { s } else { format!("{s}/") }
}

// ============================================================================
// fit
// ============================================================================

/// Format the result of fitting one image.
pub fn format_fit(
    source: &Path,
    destination: &Path,
    request: &FitRequest,
    result: &FitResult,
) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", source.display(), destination.display())];
    lines.push(format!(
        "{}Placed: {}x{} at ({}, {})",
        indent(1),
        result.placed_width,
        result.placed_height,
        result.offset_x,
        result.offset_y
    ));
    lines.push(format!(
        "{}Canvas: {}x{} {}, {}",
        indent(1),
        result.canvas_width,
        result.canvas_height,
        request.format,
        request.background
    ));
    if result.upscale_guarded {
        lines.push(format!("{}Upscale guard: kept source size", indent(1)));
    }
    lines
}

pub fn print_fit(
    source: &Path,
    destination: &Path,
    request: &FitRequest,
    result: &FitResult,
) {
    for line in format_fit(source, destination, request, result) {
        println!("{}", line);
    }
}

// ============================================================================
// copy / delete
// ============================================================================

pub fn format_copy(source: &Path, destination: &Path, stats: &TreeStats) -> Vec<String> {
    vec![
        format!("{} → {}", dir_label(source), dir_label(destination)),
        format!(
            "{}{}, {}, {}",
            indent(1),
            plural(stats.dirs, "directory", "directories"),
            plural(stats.files, "file", "files"),
            format_bytes(stats.bytes)
        ),
    ]
}

pub fn print_copy(source: &Path, destination: &Path, stats: &TreeStats) {
    for line in format_copy(source, destination, stats) {
        println!("{}", line);
    }
}

pub fn format_delete(path: &Path) -> Vec<String> {
    vec![format!("Deleted {}", path.display())]
}

pub fn print_delete(path: &Path) {
    for line in format_delete(path) {
        println!("{}", line);
    }
}

// ============================================================================
// substitute
// ============================================================================

/// Format per-file replacement counts followed by a total.
///
/// Counts are left-aligned in a column wide enough for the largest label.
pub fn format_substitution(results: &[(PathBuf, usize)]) -> Vec<String> {
    let labels: Vec<String> = results
        .iter()
        .map(|(_, n)| match n {
            0 => "unchanged".to_string(),
            n => plural(*n, "replacement", "replacements"),
        })
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut lines: Vec<String> = results
        .iter()
        .zip(&labels)
        .map(|((path, _), label)| format!("{label:<width$}  {}", path.display()))
        .collect();

    let total: usize = results.iter().map(|(_, n)| n).sum();
    let touched = results.iter().filter(|(_, n)| *n > 0).count();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} in {} of {}",
        plural(total, "replacement", "replacements"),
        touched,
        plural(results.len(), "file", "files")
    ));
    lines
}

pub fn print_substitution(results: &[(PathBuf, usize)]) {
    for line in format_substitution(results) {
        println!("{}", line);
    }
}

// ============================================================================
// zip
// ============================================================================

pub fn format_archive(source: &Path, output: &Path, summary: &ArchiveSummary) -> Vec<String> {
    vec![
        format!("{} → {}", dir_label(source), output.display()),
        format!(
            "{}{}, {}",
            indent(1),
            plural(summary.dirs, "directory", "directories"),
            plural(summary.files, "file", "files")
        ),
    ]
}

pub fn print_archive(source: &Path, output: &Path, summary: &ArchiveSummary) {
    for line in format_archive(source, output, summary) {
        println!("{}", line);
    }
}
