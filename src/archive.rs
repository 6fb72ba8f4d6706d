//! Zip packaging of a generated module directory.
//!
//! The archive *includes the root directory's name*: zipping
//! `/tmp/build/mymodule` produces entries like `mymodule/config.xml` and
//! `mymodule/views/`, which is the layout a storefront's module uploader
//! expects. Entry names are computed by stripping the parent directory of the
//! root from each walked path and always use `/` separators.
//!
//! Entries are written in file-name order so the same tree always produces
//! the same archive listing.

use log::debug;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] ZipError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Cannot archive {}: {reason}", path.display())]
    InvalidSource { path: PathBuf, reason: &'static str },
}

/// What ended up in the archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub dirs: usize,
    pub files: usize,
}

/// A zip file being written, one entry at a time.
pub struct ArchiveWriter {
    zip: ZipWriter<File>,
    summary: ArchiveSummary,
}

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
}

impl ArchiveWriter {
    /// Create (or truncate) the archive at `path`.
    pub fn create(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::create(path)?;
        Ok(Self {
            zip: ZipWriter::new(file),
            summary: ArchiveSummary::default(),
        })
    }

    /// Add the contents of the file at `path` under `archive_path`.
    pub fn add_file(&mut self, path: &Path, archive_path: &str) -> Result<(), ArchiveError> {
        let mut source = File::open(path)?;
        self.zip.start_file(archive_path, entry_options(0o644))?;
        io::copy(&mut source, &mut self.zip)?;
        self.summary.files += 1;
        Ok(())
    }

    /// Add a directory entry. A trailing `/` is appended if missing.
    pub fn add_empty_dir(&mut self, archive_path: &str) -> Result<(), ArchiveError> {
        self.zip.add_directory(archive_path, entry_options(0o755))?;
        self.summary.dirs += 1;
        Ok(())
    }

    /// Write the central directory and close the file.
    pub fn finish(self) -> Result<ArchiveSummary, ArchiveError> {
        self.zip.finish()?;
        Ok(self.summary)
    }
}

/// Join path components with `/`, regardless of platform separator.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Zip `source` (a directory, including its own name) into `output`.
pub fn zip_directory(source: &Path, output: &Path) -> Result<ArchiveSummary, ArchiveError> {
    let root = source.canonicalize()?;
    if !root.is_dir() {
        return Err(ArchiveError::InvalidSource {
            path: source.to_path_buf(),
            reason: "not a directory",
        });
    }
    let parent = root.parent().ok_or_else(|| ArchiveError::InvalidSource {
        path: source.to_path_buf(),
        reason: "the filesystem root has no name to archive under",
    })?;

    let mut writer = ArchiveWriter::create(output)?;
    // The archive may live inside the tree it packs; never add it to itself.
    let output_abs = output.canonicalize()?;

    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.path() == output_abs {
            continue;
        }
        let relative = entry.path().strip_prefix(parent).map_err(io::Error::other)?;
        let name = archive_name(relative);

        if entry.file_type().is_dir() {
            writer.add_empty_dir(&name)?;
        } else {
            writer.add_file(entry.path(), &name)?;
        }
    }

    let summary = writer.finish()?;
    debug!(
        "zipped {} -> {}: {} dirs, {} files",
        root.display(),
        output.display(),
        summary.dirs,
        summary.files
    );
    Ok(summary)
}
