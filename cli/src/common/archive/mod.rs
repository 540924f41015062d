//! # targz Archive Creation (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module packages a directory tree into a `.tar.gz` file. It is the
//! whole of the archiver: path normalization, destination preparation, the
//! encode/compress pass, and cleanup when anything goes wrong.
//!
//! ## Architecture
//!
//! One synchronous pass:
//!
//! 1. Resolve both paths to clean absolute form.
//! 2. Validate the options and the source directory (must exist, must be a
//!    directory, must not be empty).
//! 3. Create the destination's parent chain, recording what was created.
//! 4. Create the archive file behind a gzip encoder and a tar builder
//!    (`compression` submodule).
//! 5. Walk and encode the tree (`tar` submodule).
//! 6. Close tar, then gzip, then the file, each step checked.
//!
//! Steps 3 to 6 run under a `Rollback` guard. Any failure removes the archive
//! file and every directory this call created; pre-existing directories are
//! never touched.
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Creates ./backups/my_archive.tar.gz with entries rooted at "project/".
//! targz::compress("path/to/project", "backups/my_archive.tar.gz")?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
use self::compression::GzipFile;
use crate::common::fs::io::create_parent_dirs; // mkdir -p that reports what it made
use crate::common::fs::paths::absolutize; // Lexical absolute paths
use crate::common::fs::rollback::{Cleanup, Rollback}; // Undo on failure
use crate::core::error::{Result, TargzError}; // Standard Result and error kinds
use anyhow::Context; // For adding contextual information to errors
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info}; // Logging utilities

pub mod compression;
pub mod tar;

pub use self::tar::ArchiveSummary;

/// Gzip level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
/// Highest level gzip accepts.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Tunables for a single archive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Gzip level, 0 (store) through 9 (smallest).
    pub compression_level: u32,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ArchiveOptions {
    fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(TargzError::Config(format!(
                "compression level {} is out of range (0-{})",
                self.compression_level, MAX_COMPRESSION_LEVEL
            ))
            .into());
        }
        Ok(())
    }
}

/// Creates a `.tar.gz` archive at `output` from the directory `input`.
///
/// Only the last component of `input` appears in the archive: compressing
/// `/a/b/project` yields entries `project`, `project/...`. Missing parent
/// directories of `output` are created. On error nothing created by this call
/// is left behind.
///
/// Every directory gets its own entry, written before its children, whether
/// or not it is empty. For this tree:
///
/// ```text
/// my_folder/
/// ├── empty/
/// └── my_sub_folder/
///     ├── my_file.txt
///     └── my_link -> my_file.txt
/// ```
///
/// the archive lists `my_folder`, `my_folder/empty`, `my_folder/my_sub_folder`,
/// `my_folder/my_sub_folder/my_file.txt` and `my_folder/my_sub_folder/my_link`,
/// in that order. Siblings are sorted by name.
///
/// # Arguments
///
/// * `input` - The directory to archive. A symlink to a directory is archived
///   as that directory, under the link's name.
/// * `output` - Path of the `.tar.gz` file to create or overwrite.
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` once the archive is complete and synced to disk.
///
/// # Errors
///
/// Returns an error whose root cause is a [`TargzError`]; see
/// [`compress_with`] for the conditions.
pub fn compress(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    compress_with(input, output, &ArchiveOptions::default()).map(|_| ())
}

/// Like [`compress`], with explicit options, returning what was written.
///
/// # Returns
///
/// * `Result<ArchiveSummary>` - Counts of the entries written and sockets skipped.
///
/// # Errors
///
/// - `PathResolution`: a path cannot be made absolute, or `input` has no final component.
/// - `FileSystem`: the source is missing or unreadable, or any stat/read/create fails.
/// - `NotADirectory`: `input` is not a directory, or a component of the destination's parent is not one.
/// - `EmptySource`: `input` has no entries.
/// - `Encoding`: the tar or gzip layer fails to write or close.
/// - `Config`: the options are invalid.
pub fn compress_with(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ArchiveOptions,
) -> Result<ArchiveSummary> {
    compress_through(input.as_ref(), output.as_ref(), options, |file| file)
}

/// A writer layered over the gzip file that hands the file back for closing.
trait ArchiveSink: Write {
    fn into_gzip_file(self) -> GzipFile;
}

impl ArchiveSink for GzipFile {
    fn into_gzip_file(self) -> GzipFile {
        self
    }
}

/// The body of [`compress_with`]. The tar builder writes through `wrap(file)`.
fn compress_through<S, F>(
    input: &Path,
    output: &Path,
    options: &ArchiveOptions,
    wrap: F,
) -> Result<ArchiveSummary>
where
    S: ArchiveSink,
    F: FnOnce(GzipFile) -> S,
{
    options.validate()?;
    let source = absolutize(input)?;
    let destination = absolutize(output)?;
    info!(
        "Compressing {} into {}",
        source.display(),
        destination.display()
    );

    let mut rollback = Rollback::new();

    if let Some(dest_dir) = destination.parent() {
        if let Some(created) = create_parent_dirs(dest_dir)
            .context("Failed to prepare destination directory")?
        {
            rollback.push(Cleanup::RemoveDirAll(created));
        }
    }

    ensure_non_empty_dir(&source)?;

    let encoder = compression::create_gzip_file(&destination, options.compression_level)?;
    rollback.push(Cleanup::RemoveFile(destination.clone()));

    let mut builder = ::tar::Builder::new(wrap(encoder));
    let summary = self::tar::write_tree(&mut builder, &source, Some(&destination))
        .with_context(|| format!("Failed to archive '{}'", source.display()))?;

    let encoder = builder
        .into_inner()
        .map_err(|e| TargzError::encoding(&destination, e))
        .context("Failed to finalize tar archive structure")?
        .into_gzip_file();
    compression::finish_gzip_file(encoder, &destination)?;

    rollback.commit();
    info!(
        "Wrote {} entries ({} bytes of file data) to {}",
        summary.entries(),
        summary.payload_bytes,
        destination.display()
    );
    Ok(summary)
}

/// Precondition on the source: an existing, non-empty directory.
fn ensure_non_empty_dir(source: &Path) -> Result<()> {
    let meta = fs::metadata(source)
        .map_err(|e| TargzError::fs(source, e))
        .context("Failed to access source directory")?;
    if !meta.is_dir() {
        return Err(TargzError::NotADirectory {
            path: source.to_path_buf(),
        }
        .into());
    }

    let mut listing = fs::read_dir(source)
        .map_err(|e| TargzError::fs(source, e))
        .context("Failed to list source directory")?;
    match listing.next() {
        None => Err(TargzError::EmptySource {
            path: source.to_path_buf(),
        }
        .into()),
        Some(Err(e)) => Err(TargzError::fs(source, e).into()),
        Some(Ok(first)) => {
            debug!("Source is non-empty (first entry {:?})", first.file_name());
            Ok(())
        }
    }
}
