//! # targz Gzip Output Stream (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! ## Overview
//!
//! The archive is written through three nested writers:
//!
//! ```text
//! tar::Builder -> GzEncoder -> BufWriter -> File
//! ```
//!
//! This module owns the lower two layers: opening the destination file behind
//! a buffered gzip encoder, and closing the layers again in strict order. Every
//! close step is checked, so a full disk or a failed flush is reported instead
//! of leaving a silently truncated `.tar.gz` behind.
//!
use crate::core::error::{Result, TargzError}; // Standard Result and error kinds
use anyhow::Context; // For adding contextual information to errors
use flate2::write::GzEncoder; // Streaming gzip compressor
use flate2::Compression; // Compression level settings
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// The compressed output sink the tar encoder writes into.
pub type GzipFile = GzEncoder<BufWriter<File>>;

/// Creates (or truncates) the archive file at `path` and wraps it in a gzip
/// encoder.
///
/// # Arguments
///
/// * `path` - Where the archive file goes. Its parent must already exist.
/// * `level` - Gzip level, 0 (store) through 9 (smallest).
///
/// # Returns
///
/// * `Result<GzipFile>` - The open encoder, ready for the tar builder.
///
/// # Errors
///
/// Returns `TargzError::FileSystem` if the file cannot be created, for
/// example when `path` is an existing directory.
pub fn create_gzip_file(path: &Path, level: u32) -> Result<GzipFile> {
    let file = File::create(path)
        .map_err(|e| TargzError::fs(path, e))
        .with_context(|| format!("Failed to create archive file '{}'", path.display()))?;
    debug!("Opened {} with gzip level {}", path.display(), level);
    Ok(GzEncoder::new(BufWriter::new(file), Compression::new(level)))
}

/// Closes the gzip stream, flushes the buffer, and syncs the file to disk.
///
/// Each step runs only if the previous one succeeded; the first failure is returned.
///
/// # Errors
///
/// * `TargzError::Encoding` if the gzip trailer cannot be written.
/// * `TargzError::FileSystem` if the buffered bytes cannot be flushed or the
///   file cannot be synced.
pub fn finish_gzip_file(encoder: GzipFile, path: &Path) -> Result<()> {
    let buffered = encoder
        .finish()
        .map_err(|e| TargzError::encoding(path, e))
        .context("Failed to finish gzip compression stream")?;

    let file = buffered
        .into_inner()
        .map_err(|e| TargzError::fs(path, e.into_error()))
        .context("Failed to flush archive file")?;

    file.sync_all()
        .map_err(|e| TargzError::fs(path, e))
        .context("Failed to close archive file")?;
    Ok(())
}
