//! # targz Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module prepares the destination side of an archive run: it makes sure
//! the directory that will hold the archive exists, and reports exactly which
//! directory it had to create so the caller can undo that on failure.
//!
//! ## Architecture
//!
//! - **`create_parent_dirs`**: Walks up from the requested directory to the first
//!   ancestor that exists. An ancestor that exists but is not a directory is a
//!   structural error. Otherwise the missing chain is created with
//!   `fs::create_dir_all` and the topmost created directory is returned.
//! - **`remove_path`**: Best-effort removal of a file or a directory tree, used by
//!   the rollback guard.
//!
//! ```rust,no_run
//! use targz::common::fs::io;
//! use std::path::Path;
//!
//! # fn run_example() -> targz::core::error::Result<()> {
//! if let Some(created) = io::create_parent_dirs(Path::new("/srv/backups/2024/05"))? {
//!     println!("created {}", created.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{Result, TargzError}; // Standard Result and error kinds
use std::fs; // Standard filesystem module
use std::io;
use std::path::{Path, PathBuf}; // Filesystem path types
use tracing::{debug, info}; // Logging utilities

/// Ensures `dir` exists as a directory, creating any missing ancestors.
///
/// Existing directories are accepted as-is, so calling this repeatedly for the
/// same destination never fails with "already exists". Symlinks to directories
/// count as directories.
///
/// # Arguments
///
/// * `dir` - Absolute path of the directory that must exist.
///
/// # Returns
///
/// * `Ok(Some(path))` - The topmost directory this call created. Removing it
///   recursively restores the filesystem to its previous state.
/// * `Ok(None)` - `dir` already existed; nothing was created.
///
/// # Errors
///
/// - `TargzError::NotADirectory` if `dir` or one of its ancestors exists but is not a directory.
/// - `TargzError::FileSystem` if an ancestor cannot be inspected or the chain cannot be created.
pub fn create_parent_dirs(dir: &Path) -> Result<Option<PathBuf>> {
    let mut topmost_missing: Option<&Path> = None;
    let mut current = Some(dir);

    while let Some(p) = current {
        match fs::metadata(p) {
            Ok(meta) if meta.is_dir() => break,
            Ok(_) => {
                return Err(TargzError::NotADirectory {
                    path: p.to_path_buf(),
                }
                .into())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // A dangling symlink also reports NotFound here; create_dir_all
                // will then fail on it and surface the error below.
                topmost_missing = Some(p);
                current = p.parent();
            }
            Err(e) => return Err(TargzError::fs(p, e).into()),
        }
    }

    let Some(topmost) = topmost_missing else {
        debug!("Destination directory already exists: {}", dir.display());
        return Ok(None);
    };

    fs::create_dir_all(dir).map_err(|e| TargzError::fs(dir, e))?;
    info!(
        "Created destination directory {} (rollback root {})",
        dir.display(),
        topmost.display()
    );
    Ok(Some(topmost.to_path_buf()))
}

/// Removes a file, symlink, or directory tree at `path`.
///
/// Symlinks are removed themselves, never followed, so a link to a directory
/// outside the tree leaves that directory alone.
///
/// # Arguments
///
/// * `path` - The path to delete.
///
/// # Returns
///
/// * `io::Result<()>` - `Ok(())` if the path is gone afterwards, including
///   when it never existed.
///
/// # Errors
///
/// Returns the underlying I/O error if the path exists but cannot be removed.
/// The rollback guard logs it and carries on.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
