//! Playground archive packaging.
//!
//! The in-browser playground downloads the toolkit's source tree as a single
//! zip and extracts it into a virtual filesystem. Every file under the source
//! root is stored under a stable logical folder name, so the archive contents
//! look the same no matter where the toolkit is installed on the build host:
//!
//! ```text
//! /usr/lib/python3/site-packages/jaclang/        jaclang.zip
//! ├── __init__.py                          →    jaclang/__init__.py
//! └── compiler/                                  jaclang/compiler/parser.py
//!     └── parser.py
//! ```
//!
//! ## Entries
//!
//! - Only files are written; directories are implied by entry names.
//! - Every entry is Deflate-compressed. No ignore patterns, nothing renamed.
//! - Entries carry the file's modification time.
//! - Nothing is skipped silently: an unreadable file or a dangling symlink
//!   aborts the build with an I/O error.
//! - Entry names always use `/` separators.
//!
//! ## Ordering
//!
//! With [`ArchiveOptions::sort_entries`] the walk visits children in file
//! name order, which makes the entry list reproducible across machines.
//! Without it entries follow filesystem traversal order.
//!
//! The builder never deletes an existing archive; it truncates whatever is at
//! the output path. Removing the previous archive is the hook's first step.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Packaging source not found: {0}")]
    SourceMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Knobs that differ between deployments.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveOptions {
    /// Create the output's parent directory when it does not exist.
    pub create_parent_dir: bool,
    /// Visit directory children in file name order.
    pub sort_entries: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            create_parent_dir: true,
            sort_entries: true,
        }
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: u64,
}

/// Package every file under `source_root` into a zip at `output_path`.
///
/// Entry names are `folder_name/<path relative to source_root>`.
pub fn build_archive(
    source_root: &Path,
    output_path: &Path,
    folder_name: &str,
    options: ArchiveOptions,
) -> Result<ArchiveSummary, ArchiveError> {
    if !source_root.is_dir() {
        return Err(ArchiveError::SourceMissing(source_root.to_path_buf()));
    }

    if options.create_parent_dir
        && let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    tracing::info!(
        source = %source_root.display(),
        output = %output_path.display(),
        "Creating playground archive"
    );

    let file = File::create(output_path)?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let file_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut walker = WalkDir::new(source_root).follow_links(false);
    if options.sort_entries {
        walker = walker.sort_by_file_name();
    }

    let mut entries = 0;
    for entry in walker {
        let entry = entry?;
        // Follows symlinks: a link to a directory is skipped like any
        // directory, everything else is opened. A dangling link fails here.
        if entry.path().is_dir() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        let name = entry_name(folder_name, relative);
        tracing::debug!(entry = %name, "Adding archive entry");

        let mut source = File::open(entry.path())?;
        zip.start_file(name, with_modified_time(file_options, &source))?;
        io::copy(&mut source, &mut zip)?;
        entries += 1;
    }

    let mut writer = zip.finish()?;
    io::Write::flush(&mut writer)?;
    drop(writer);

    let bytes = fs::metadata(output_path)?.len();
    tracing::info!(entries, bytes, "Archive saved to {}", output_path.display());

    Ok(ArchiveSummary {
        path: output_path.to_path_buf(),
        entries,
        bytes,
    })
}

/// Stamp the entry with the file's local modification time.
///
/// Zip timestamps only cover 1980 to 2107; outside that range the entry keeps
/// the format's default time.
fn with_modified_time(options: SimpleFileOptions, file: &File) -> SimpleFileOptions {
    let modified = file
        .metadata()
        .and_then(|m| m.modified())
        .ok()
        .map(|t| chrono::DateTime::<chrono::Local>::from(t).naive_local())
        .and_then(|t| zip::DateTime::try_from(t).ok());
    match modified {
        Some(time) => options.last_modified_time(time),
        None => options,
    }
}

/// Join `folder_name` and a relative path with `/` separators.
///
/// Only normal components contribute; `.` segments are dropped so the name
/// never depends on how the relative path was spelled.
pub fn entry_name(folder_name: &str, relative: &Path) -> String {
    let mut name = folder_name.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}
