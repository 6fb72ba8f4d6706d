//! Shared test utilities for the modgen test suite.
//!
//! Provides synthetic image writers for the imaging tests and a small module
//! skeleton plus a tree comparison for the copy/delete/zip tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_skeleton(&tmp.path().join("mymodule"));
//! create_test_png(&tmp.path().join("logo.png"), 64, 48);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// =========================================================================
// Synthetic images
// =========================================================================

/// Write an opaque RGBA8 PNG filled with a gradient.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    img.save_with_format(path, ImageFormat::Png)
        .unwrap_or_else(|e| panic!("cannot write test PNG {}: {e}", path.display()));
}

/// Write an RGB JPEG filled with a gradient.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, 64, (y % 256) as u8]));
    let file = fs::File::create(path).unwrap();
    JpegEncoder::new_with_quality(file, 90)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap_or_else(|e| panic!("cannot write test JPEG {}: {e}", path.display()));
}

/// Write a single-entry ICO file.
pub fn create_test_ico(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    img.save_with_format(path, ImageFormat::Ico)
        .unwrap_or_else(|e| panic!("cannot write test ICO {}: {e}", path.display()));
}

// =========================================================================
// Module skeleton trees
// =========================================================================

/// Lay out a small module skeleton under `root`.
///
/// ```text
/// root/
/// ├── config.xml
/// ├── mymodule.php
/// ├── upgrade/                       (empty)
/// └── views/
///     ├── img/logo.png               (binary)
///     └── templates/hook/display.tpl
/// ```
///
/// Five directories below `root`, four files.
pub fn write_skeleton(root: &Path) {
    fs::create_dir_all(root.join("views/templates/hook")).unwrap();
    fs::create_dir_all(root.join("views/img")).unwrap();
    fs::create_dir_all(root.join("upgrade")).unwrap();

    fs::write(
        root.join("config.xml"),
        "<?xml version=\"1.0\"?>\n<module><name>{{module_name}}</name></module>\n",
    )
    .unwrap();
    fs::write(
        root.join("mymodule.php"),
        "<?php\nclass {{ModuleClass}} extends Module\n{\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("views/templates/hook/display.tpl"),
        "<div class=\"{{module_name}}\">{l s='Hello' mod='{{module_name}}'}</div>\n",
    )
    .unwrap();
    fs::write(
        root.join("views/img/logo.png"),
        [0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10, 0x20],
    )
    .unwrap();
}

/// Relative path → (is_dir, contents) for every entry below `root`.
fn snapshot(root: &Path) -> Vec<(PathBuf, bool, Vec<u8>)> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            if entry.file_type().is_dir() {
                (rel, true, Vec::new())
            } else {
                (rel, false, fs::read(entry.path()).unwrap())
            }
        })
        .collect()
}

/// Assert two trees hold the same paths, entry kinds, and file bytes.
pub fn assert_trees_equal(expected: &Path, actual: &Path) {
    let left = snapshot(expected);
    let right = snapshot(actual);

    let left_paths: Vec<&PathBuf> = left.iter().map(|(p, _, _)| p).collect();
    let right_paths: Vec<&PathBuf> = right.iter().map(|(p, _, _)| p).collect();
    assert_eq!(
        left_paths,
        right_paths,
        "tree listings differ between {} and {}",
        expected.display(),
        actual.display()
    );

    for ((path, l_dir, l_bytes), (_, r_dir, r_bytes)) in left.iter().zip(&right) {
        assert_eq!(l_dir, r_dir, "entry kind differs at {}", path.display());
        assert!(l_bytes == r_bytes, "contents differ at {}", path.display());
    }
}
