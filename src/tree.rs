//! Recursive copy and delete of module skeleton trees.
//!
//! Both walks use [`walkdir`], which never yields `.` or `..` and does not
//! follow symlinks:
//!
//! - [`copy_tree`] walks pre-order, so every directory exists before its
//!   children are copied into it.
//! - [`delete_tree`] walks contents-first, so a directory is only removed once
//!   it is empty.
//!
//! Any filesystem failure stops the walk and is returned with the offending
//! path. Nothing is retried and nothing is skipped silently.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("IO error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> TreeError + '_ {
    move |source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Counts of what a copy produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub dirs: usize,
    pub files: usize,
    pub bytes: u64,
}

/// Copy a file, or recursively copy a directory's contents into `dest`.
///
/// For a directory source, `dest` is created if missing and receives the
/// *contents* of `source` (not `source` itself). Existing files are
/// overwritten; existing directories are reused.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<TreeStats, TreeError> {
    let mut stats = TreeStats::default();

    let meta = fs::metadata(source).map_err(io_at(source))?;
    if !meta.is_dir() {
        stats.bytes = fs::copy(source, dest).map_err(io_at(dest))?;
        stats.files = 1;
        return Ok(stats);
    }

    if !dest.is_dir() {
        fs::create_dir_all(dest).map_err(io_at(dest))?;
    }

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| TreeError::Io {
                path: entry.path().to_path_buf(),
                source: io::Error::other(e),
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            if !target.is_dir() {
                fs::create_dir(&target).map_err(io_at(&target))?;
            }
            stats.dirs += 1;
        } else {
            stats.bytes += fs::copy(entry.path(), &target).map_err(io_at(&target))?;
            stats.files += 1;
        }
    }

    debug!(
        "copied {} -> {}: {} dirs, {} files, {} bytes",
        source.display(),
        dest.display(),
        stats.dirs,
        stats.files,
        stats.bytes
    );
    Ok(stats)
}

/// Delete a file, or recursively delete a directory and everything under it.
///
/// Symlinks inside the tree are removed as links; their targets are untouched.
pub fn delete_tree(path: &Path) -> Result<(), TreeError> {
    let meta = fs::symlink_metadata(path).map_err(io_at(path))?;
    if !meta.is_dir() {
        return fs::remove_file(path).map_err(io_at(path));
    }

    for entry in WalkDir::new(path).min_depth(1).contents_first(true) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path()).map_err(io_at(entry.path()))?;
        } else {
            fs::remove_file(entry.path()).map_err(io_at(entry.path()))?;
        }
    }
    fs::remove_dir(path).map_err(io_at(path))?;

    debug!("deleted {}", path.display());
    Ok(())
}
